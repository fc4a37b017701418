//! Settlement command and query handlers.

mod get_settlement_status;
mod respond_to_settlement;
mod submit_settlement;

pub use get_settlement_status::GetSettlementStatusHandler;
pub use respond_to_settlement::{RespondToSettlementCommand, RespondToSettlementHandler};
pub use submit_settlement::{SubmitSettlementCommand, SubmitSettlementHandler};
