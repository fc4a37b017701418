//! SettlementStage enum for tracking the lifecycle of the settlement.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle stage of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStage {
    Submitted,
    Approved,
    Rejected,
}

impl StateMachine for SettlementStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SettlementStage::*;
        matches!(
            (self, target),
            (Submitted, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Rejected, Submitted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SettlementStage::*;
        match self {
            Submitted => vec![Submitted, Approved, Rejected],
            Rejected => vec![Submitted],
            Approved => vec![],
        }
    }
}

impl fmt::Display for SettlementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettlementStage::Submitted => "submitted",
            SettlementStage::Approved => "approved",
            SettlementStage::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}
