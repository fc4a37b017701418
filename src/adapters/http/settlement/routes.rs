//! HTTP routes for settlement endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_settlement_status, respond_to_settlement, submit_settlement, SettlementHandlers,
};

/// Creates the settlement router with all endpoints.
pub fn settlement_routes(handlers: SettlementHandlers) -> Router {
    Router::new()
        .route("/status", get(get_settlement_status))
        .route("/submit", post(submit_settlement))
        .route("/respond", post(respond_to_settlement))
        .with_state(handlers)
}
