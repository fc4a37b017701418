//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod settlement;

pub use settlement::{
    GetSettlementStatusHandler, RespondToSettlementCommand, RespondToSettlementHandler,
    SubmitSettlementCommand, SubmitSettlementHandler,
};
