//! Stage policy - which operations are legal in which stage.
//!
//! Pure decision logic. The store applies it authoritatively; the sync agent
//! mirrors it on its cached copy to disable actions ahead of time, which is
//! advisory only.
//!
//! | Current   | submit                     | respond                    |
//! |-----------|----------------------------|----------------------------|
//! | none      | allow -> submitted         | deny (no settlement)       |
//! | submitted | allow -> submitted         | allow -> approved/rejected |
//! | approved  | deny (invalid state)       | deny (invalid state)       |
//! | rejected  | allow -> submitted         | deny (no settlement)       |

use std::fmt;

use super::{SettlementError, SettlementStage};
use crate::domain::foundation::StateMachine;

/// Mutating operations on the settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Submit,
    Respond,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Submit => write!(f, "submit"),
            Operation::Respond => write!(f, "respond"),
        }
    }
}

/// Reason code attached to a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// Nothing is awaiting a response.
    NoSettlement,
    /// The settlement is approved and can no longer change.
    InvalidState,
}

/// Outcome of evaluating an operation against the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(DenyReason),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow)
    }

    /// Converts a denial into the matching domain error.
    pub fn into_result(self, current: Option<SettlementStage>) -> Result<(), SettlementError> {
        match self {
            PolicyDecision::Allow => Ok(()),
            PolicyDecision::Deny(DenyReason::NoSettlement) => Err(SettlementError::no_settlement()),
            PolicyDecision::Deny(DenyReason::InvalidState) => {
                Err(SettlementError::invalid_state(match current {
                    Some(stage) => format!("settlement is {}, no changes can be made", stage),
                    None => "no changes can be made".to_string(),
                }))
            }
        }
    }
}

/// Decides whether `operation` is legal given the current stage.
pub fn evaluate(current: Option<SettlementStage>, operation: Operation) -> PolicyDecision {
    let allowed = match (current, operation) {
        (None, Operation::Submit) => true,
        (None, Operation::Respond) => false,
        (Some(stage), Operation::Submit) => stage.can_transition_to(&SettlementStage::Submitted),
        // Approve and reject share their sources, checking one covers both.
        (Some(stage), Operation::Respond) => stage.can_transition_to(&SettlementStage::Approved),
    };

    if allowed {
        PolicyDecision::Allow
    } else if current.map_or(false, |stage| stage.is_terminal()) {
        PolicyDecision::Deny(DenyReason::InvalidState)
    } else {
        PolicyDecision::Deny(DenyReason::NoSettlement)
    }
}
