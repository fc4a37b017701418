//! Settlement module - the single negotiated record and its lifecycle.
//!
//! - `SettlementStage` - submitted / approved / rejected
//! - `Settlement` - amount, stage and optional comment
//! - `policy` - which operations are legal in which stage

mod aggregate;
mod amount;
mod decision;
mod errors;
mod party;
pub mod policy;
mod stage;

pub use aggregate::Settlement;
pub use amount::Amount;
pub use decision::Decision;
pub use errors::SettlementError;
pub use party::Party;
pub use policy::{DenyReason, Operation, PolicyDecision};
pub use stage::SettlementStage;
