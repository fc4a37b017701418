//! Decision taken by the responding party.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SettlementStage;
use crate::domain::foundation::ValidationError;

/// Response to a submitted settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Stage the settlement moves to when this decision is applied.
    pub fn resulting_stage(&self) -> SettlementStage {
        match self {
            Decision::Approve => SettlementStage::Approved,
            Decision::Reject => SettlementStage::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

impl FromStr for Decision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            "" => Err(ValidationError::empty_field("response")),
            other => Err(ValidationError::invalid_format(
                "response",
                format!("expected 'approve' or 'reject', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
