//! In-Memory Settlement Store Adapter
//!
//! Holds the settlement for the lifetime of the process. Each instance is
//! independent, so tests can run as many stores side by side as they need.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::settlement::{Amount, Decision, Settlement, SettlementError};
use crate::ports::SettlementStore;

/// In-memory storage for the current settlement
#[derive(Debug, Clone, Default)]
pub struct InMemorySettlementStore {
    current: Arc<RwLock<Option<Settlement>>>,
}

impl InMemorySettlementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettlementStore for InMemorySettlementStore {
    async fn submit(&self, amount: Amount) -> Result<Settlement, SettlementError> {
        // Write guard spans check and write.
        let mut current = self.current.write().await;
        let next = Settlement::submit(current.as_ref(), amount)?;
        *current = Some(next.clone());
        Ok(next)
    }

    async fn respond(
        &self,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Settlement, SettlementError> {
        let mut current = self.current.write().await;
        let next = Settlement::respond(current.as_ref(), decision, comment)?;
        *current = Some(next.clone());
        Ok(next)
    }

    async fn status(&self) -> Option<Settlement> {
        self.current.read().await.clone()
    }
}
