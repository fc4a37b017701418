//! Client-side adapters for reaching the settlement service.

mod http_settlement_gateway;

pub use http_settlement_gateway::HttpSettlementGateway;
