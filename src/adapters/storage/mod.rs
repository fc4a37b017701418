//! Storage adapters for the settlement record.

mod in_memory_settlement_store;

pub use in_memory_settlement_store::InMemorySettlementStore;
