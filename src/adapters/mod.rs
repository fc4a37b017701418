//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - In-memory settlement store
//! - `http` - REST API served with axum
//! - `client` - reqwest gateway used by the sync agent

pub mod client;
pub mod http;
pub mod storage;

pub use client::HttpSettlementGateway;
pub use http::{build_router, SettlementHandlers};
pub use storage::InMemorySettlementStore;
