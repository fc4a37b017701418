//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, state machine trait)
//! - `settlement` - The settlement record, its stages and the stage policy

pub mod foundation;
pub mod settlement;
