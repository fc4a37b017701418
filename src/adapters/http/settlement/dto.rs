//! HTTP DTOs for settlement endpoints.
//!
//! Request bodies are decoded loosely (`serde_json::Value` fields) and then
//! validated field by field, so every malformed payload surfaces as a
//! validation failure before the store is touched.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::settlement::{
    RespondToSettlementCommand, SubmitSettlementCommand,
};
use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::domain::settlement::{Amount, Decision, Settlement, SettlementError, SettlementStage};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to submit an amount.
///
/// `amount` accepts a JSON number or a numeric string such as `"100"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitSettlementRequest {
    #[serde(default)]
    pub amount: Option<Value>,
}

impl SubmitSettlementRequest {
    pub fn into_command(self) -> Result<SubmitSettlementCommand, SettlementError> {
        let amount = coerce_amount(self.amount)?;
        Ok(SubmitSettlementCommand { amount })
    }
}

/// Request to approve or reject the current settlement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespondToSettlementRequest {
    #[serde(default)]
    pub response: Option<Value>,
    #[serde(default)]
    pub comment: Option<Value>,
}

impl RespondToSettlementRequest {
    pub fn into_command(self) -> Result<RespondToSettlementCommand, SettlementError> {
        let decision = parse_decision(self.response)?;
        let comment = parse_comment(self.comment)?;
        Ok(RespondToSettlementCommand { decision, comment })
    }
}

/// Decodes a JSON body, reporting malformed input as a validation failure.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, SettlementError> {
    serde_json::from_slice(body)
        .map_err(|e| SettlementError::validation("body", format!("malformed JSON: {}", e)))
}

fn coerce_amount(value: Option<Value>) -> Result<Amount, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::empty_field("amount")),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => Amount::new(v),
            None => Err(ValidationError::invalid_format("amount", "not representable")),
        },
        Some(Value::String(s)) => Amount::parse(&s),
        Some(other) => Err(ValidationError::invalid_format(
            "amount",
            format!("expected a number, got {}", json_kind(&other)),
        )),
    }
}

fn parse_decision(value: Option<Value>) -> Result<Decision, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::empty_field("response")),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(ValidationError::invalid_format(
            "response",
            format!("expected 'approve' or 'reject', got {}", json_kind(&other)),
        )),
    }
}

fn parse_comment(value: Option<Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(ValidationError::invalid_format(
            "comment",
            format!("expected text, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Settlement as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub amount: f64,
    pub stage: SettlementStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<Settlement> for SettlementResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            amount: settlement.amount().value(),
            stage: settlement.stage(),
            comment: settlement.comment().map(str::to_string),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Code parsed back into the domain vocabulary, if recognised.
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_wire(&self.code)
    }
}

impl From<&SettlementError> for ErrorResponse {
    fn from(error: &SettlementError) -> Self {
        let response = ErrorResponse::new(error.code(), error.message());
        match error {
            SettlementError::ValidationFailed { field, .. } => {
                response.with_details(serde_json::json!({ "field": field }))
            }
            _ => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submit(body: Value) -> Result<SubmitSettlementCommand, SettlementError> {
        serde_json::from_value::<SubmitSettlementRequest>(body)
            .unwrap()
            .into_command()
    }

    fn respond(body: Value) -> Result<RespondToSettlementCommand, SettlementError> {
        serde_json::from_value::<RespondToSettlementRequest>(body)
            .unwrap()
            .into_command()
    }

    #[test]
    fn submit_accepts_number_and_numeric_string() {
        assert_eq!(submit(json!({ "amount": 100 })).unwrap().amount.value(), 100.0);
        assert_eq!(submit(json!({ "amount": "12.5" })).unwrap().amount.value(), 12.5);
    }

    #[test]
    fn submit_rejects_non_numeric_amounts() {
        for body in [
            json!({ "amount": "abc" }),
            json!({ "amount": true }),
            json!({ "amount": null }),
            json!({ "amount": -1 }),
            json!({}),
        ] {
            let err = submit(body.clone()).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationFailed, "{}", body);
        }
    }

    #[test]
    fn respond_parses_decision_and_comment() {
        let cmd = respond(json!({ "response": "approve", "comment": "ok" })).unwrap();
        assert_eq!(cmd.decision, Decision::Approve);
        assert_eq!(cmd.comment.as_deref(), Some("ok"));

        let cmd = respond(json!({ "response": "reject" })).unwrap();
        assert_eq!(cmd.decision, Decision::Reject);
        assert_eq!(cmd.comment, None);
    }

    #[test]
    fn respond_allows_empty_comment() {
        let cmd = respond(json!({ "response": "reject", "comment": "" })).unwrap();
        assert_eq!(cmd.comment.as_deref(), Some(""));
    }

    #[test]
    fn respond_rejects_unknown_decision_and_non_text_comment() {
        assert!(respond(json!({ "response": "maybe" })).is_err());
        assert!(respond(json!({})).is_err());
        let err = respond(json!({ "response": "approve", "comment": 5 })).unwrap_err();
        match err {
            SettlementError::ValidationFailed { field, .. } => assert_eq!(field, "comment"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_body_reports_malformed_json_as_validation() {
        let err = decode_body::<SubmitSettlementRequest>(b"{not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn settlement_response_omits_absent_comment() {
        let settlement = Settlement::submit(None, Amount::new(100.0).unwrap()).unwrap();
        let json = serde_json::to_value(SettlementResponse::from(settlement)).unwrap();
        assert_eq!(json, json!({ "amount": 100.0, "stage": "submitted" }));
    }

    #[test]
    fn error_response_carries_code_and_field() {
        let error = SettlementError::validation("amount", "bad");
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "VALIDATION_FAILED");
        assert_eq!(response.error_code(), Some(ErrorCode::ValidationFailed));
        assert_eq!(response.details, Some(json!({ "field": "amount" })));
    }
}
