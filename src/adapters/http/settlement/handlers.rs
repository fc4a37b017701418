//! HTTP handlers for settlement endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::application::handlers::settlement::{
    GetSettlementStatusHandler, RespondToSettlementHandler, SubmitSettlementHandler,
};
use crate::domain::settlement::SettlementError;
use crate::ports::SettlementStore;

use super::dto::{
    decode_body, ErrorResponse, RespondToSettlementRequest, SettlementResponse,
    SubmitSettlementRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SettlementHandlers {
    submit_handler: Arc<SubmitSettlementHandler>,
    respond_handler: Arc<RespondToSettlementHandler>,
    status_handler: Arc<GetSettlementStatusHandler>,
}

impl SettlementHandlers {
    pub fn new(
        submit_handler: Arc<SubmitSettlementHandler>,
        respond_handler: Arc<RespondToSettlementHandler>,
        status_handler: Arc<GetSettlementStatusHandler>,
    ) -> Self {
        Self {
            submit_handler,
            respond_handler,
            status_handler,
        }
    }

    /// Wires all three handlers against one store.
    pub fn from_store(store: Arc<dyn SettlementStore>) -> Self {
        Self::new(
            Arc::new(SubmitSettlementHandler::new(store.clone())),
            Arc::new(RespondToSettlementHandler::new(store.clone())),
            Arc::new(GetSettlementStatusHandler::new(store)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/submit - Submit or resubmit an amount
pub async fn submit_settlement(
    State(handlers): State<SettlementHandlers>,
    body: Bytes,
) -> Response {
    let cmd = match decode_body::<SubmitSettlementRequest>(&body).and_then(|r| r.into_command())
    {
        Ok(cmd) => cmd,
        Err(e) => return handle_settlement_error(e),
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(settlement) => {
            (StatusCode::OK, Json(SettlementResponse::from(settlement))).into_response()
        }
        Err(e) => handle_settlement_error(e),
    }
}

/// POST /api/respond - Approve or reject the current settlement
pub async fn respond_to_settlement(
    State(handlers): State<SettlementHandlers>,
    body: Bytes,
) -> Response {
    let cmd = match decode_body::<RespondToSettlementRequest>(&body)
        .and_then(|r| r.into_command())
    {
        Ok(cmd) => cmd,
        Err(e) => return handle_settlement_error(e),
    };

    match handlers.respond_handler.handle(cmd).await {
        Ok(settlement) => {
            (StatusCode::OK, Json(SettlementResponse::from(settlement))).into_response()
        }
        Err(e) => handle_settlement_error(e),
    }
}

/// GET /api/status - Current settlement, or `null` before the first submission
pub async fn get_settlement_status(State(handlers): State<SettlementHandlers>) -> Response {
    let settlement = handlers
        .status_handler
        .handle()
        .await
        .map(SettlementResponse::from);
    (StatusCode::OK, Json(settlement)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_settlement_error(error: SettlementError) -> Response {
    let status = match &error {
        SettlementError::ValidationFailed { .. } => {
            debug!(error = %error, "rejecting malformed settlement payload");
            StatusCode::BAD_REQUEST
        }
        SettlementError::NoSettlement => StatusCode::NOT_FOUND,
        SettlementError::InvalidState(_) => StatusCode::CONFLICT,
        SettlementError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse::from(&error))).into_response()
}
