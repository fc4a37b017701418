//! HTTP adapter for settlement endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, RespondToSettlementRequest, SettlementResponse, SubmitSettlementRequest,
};
pub use handlers::SettlementHandlers;
pub use routes::settlement_routes;
