//! SettlementStore port - Interface for the canonical settlement record.
//!
//! The store owns the one settlement and is the authority on transitions.
//! Implementations must run the read-check-write of `submit` and `respond`
//! atomically with respect to each other.

use async_trait::async_trait;

use crate::domain::settlement::{Amount, Decision, Settlement, SettlementError};

/// Port for holding the current settlement and enforcing transition rules.
#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Creates or replaces the settlement with a fresh submission.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the current settlement is approved
    async fn submit(&self, amount: Amount) -> Result<Settlement, SettlementError>;

    /// Records the responding party's decision and comment.
    ///
    /// # Errors
    ///
    /// - `NoSettlement` if nothing is awaiting a response
    /// - `InvalidState` if the current settlement is approved
    async fn respond(
        &self,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Settlement, SettlementError>;

    /// Returns the current settlement, if any. Never fails.
    async fn status(&self) -> Option<Settlement>;
}
