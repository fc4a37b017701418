//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SettlementStore` - Server-side owner of the canonical settlement
//! - `SettlementGateway` - Client-side request/response channel to the service

mod settlement_gateway;
mod settlement_store;

pub use settlement_gateway::{GatewayError, SettlementGateway};
pub use settlement_store::SettlementStore;
