//! SettlementGateway port - Client-side access to the settlement service.
//!
//! The sync agent talks to the service only through this port, which keeps
//! the transport (HTTP in production, mocks in tests) out of the agent.

use async_trait::async_trait;

use crate::domain::foundation::ErrorCode;
use crate::domain::settlement::{Decision, Settlement};

/// Errors surfaced by a gateway call.
///
/// Service-side failure kinds are preserved so callers can tell a rejected
/// payload from a settlement that is already final.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No settlement: {0}")]
    NoSettlement(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport(message.into())
    }

    /// Rebuilds the service-side kind from an error code and message.
    pub fn from_service(code: ErrorCode, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            ErrorCode::ValidationFailed => GatewayError::Validation(message),
            ErrorCode::NoSettlement => GatewayError::NoSettlement(message),
            ErrorCode::InvalidState => GatewayError::InvalidState(message),
            ErrorCode::InternalError => GatewayError::UnexpectedResponse { status, message },
        }
    }

    /// True for failures where the request never produced a service answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            GatewayError::Transport(_) | GatewayError::Timeout { .. }
        )
    }
}

/// Port for issuing settlement requests to the service.
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Fetches the current settlement, `None` if nothing was submitted yet.
    async fn fetch_status(&self) -> Result<Option<Settlement>, GatewayError>;

    /// Submits an amount. Range checks are left to the service; a non-finite
    /// value has no JSON form and fails as `Validation` without a request.
    async fn submit(&self, amount: f64) -> Result<Settlement, GatewayError>;

    /// Approves or rejects the current settlement.
    async fn respond(
        &self,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Settlement, GatewayError>;
}
