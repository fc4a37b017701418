//! Application layer - Commands, Queries, Handlers and the sync agent.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;
pub mod sync;

pub use handlers::{
    GetSettlementStatusHandler, RespondToSettlementCommand, RespondToSettlementHandler,
    SubmitSettlementCommand, SubmitSettlementHandler,
};
pub use sync::{PollOutcome, PollingHandle, SettlementSnapshot, SettlementSyncAgent, SyncAgentConfig};
