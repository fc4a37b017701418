//! Settlement-specific error types.

use crate::domain::foundation::{ErrorCode, ValidationError};

/// Settlement-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// Payload was malformed or out of range.
    ValidationFailed { field: String, message: String },
    /// Respond was issued with nothing awaiting a response.
    NoSettlement,
    /// The settlement is approved and cannot change.
    InvalidState(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl SettlementError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SettlementError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn no_settlement() -> Self {
        SettlementError::NoSettlement
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SettlementError::InvalidState(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SettlementError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SettlementError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SettlementError::NoSettlement => ErrorCode::NoSettlement,
            SettlementError::InvalidState(_) => ErrorCode::InvalidState,
            SettlementError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SettlementError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SettlementError::NoSettlement => "No settlement submitted".to_string(),
            SettlementError::InvalidState(msg) => format!("Invalid state: {}", msg),
            SettlementError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SettlementError {}

impl From<ValidationError> for SettlementError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        SettlementError::ValidationFailed {
            field,
            message: err.to_string(),
        }
    }
}
