//! Settlement aggregate.
//!
//! There is at most one settlement at a time. Transitions take the current
//! record (if any) and produce its replacement, leaving storage to the
//! caller so the whole read-check-write can run under a single lock.

use serde::{Deserialize, Serialize};

use super::policy::{self, Operation};
use super::{Amount, Decision, SettlementError, SettlementStage};

/// The record being negotiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    amount: Amount,
    stage: SettlementStage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Settlement {
    /// Creates the record for a fresh submission, replacing `current`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `current` is approved
    pub fn submit(current: Option<&Settlement>, amount: Amount) -> Result<Self, SettlementError> {
        let stage = current.map(|s| s.stage);
        policy::evaluate(stage, Operation::Submit).into_result(stage)?;

        Ok(Self {
            amount,
            stage: SettlementStage::Submitted,
            comment: None,
        })
    }

    /// Applies the responding party's decision to `current`.
    ///
    /// The amount is carried over; the comment is attached as given.
    ///
    /// # Errors
    ///
    /// - `NoSettlement` if there is no record or it is not awaiting a response
    /// - `InvalidState` if `current` is approved
    pub fn respond(
        current: Option<&Settlement>,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Self, SettlementError> {
        let stage = current.map(|s| s.stage);
        policy::evaluate(stage, Operation::Respond).into_result(stage)?;

        let current = current.ok_or_else(SettlementError::no_settlement)?;
        Ok(Self {
            amount: current.amount,
            stage: decision.resulting_stage(),
            comment,
        })
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn stage(&self) -> SettlementStage {
        self.stage
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn is_approved(&self) -> bool {
        self.stage == SettlementStage::Approved
    }
}
