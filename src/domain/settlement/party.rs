//! The two roles driving the workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Operation;

/// A participant in the settlement. Parties are not authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Party {
    /// Proposes the amount.
    Submitter,
    /// Approves or rejects the proposal.
    Responder,
}

impl Party {
    /// The operation this party drives.
    pub fn operation(&self) -> Operation {
        match self {
            Party::Submitter => Operation::Submit,
            Party::Responder => Operation::Respond,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Party::Submitter => "submitter",
            Party::Responder => "responder",
        };
        write!(f, "{}", s)
    }
}
