//! Client-side synchronization of the settlement view.

mod settlement_sync_agent;

pub use settlement_sync_agent::{
    PollOutcome, PollingHandle, SettlementSnapshot, SettlementSyncAgent, SyncAgentConfig,
};
