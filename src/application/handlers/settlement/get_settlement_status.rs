//! GetSettlementStatusHandler - Query handler for the current settlement.

use std::sync::Arc;

use crate::domain::settlement::Settlement;
use crate::ports::SettlementStore;

/// Handler returning the current settlement verbatim.
pub struct GetSettlementStatusHandler {
    store: Arc<dyn SettlementStore>,
}

impl GetSettlementStatusHandler {
    pub fn new(store: Arc<dyn SettlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Option<Settlement> {
        self.store.status().await
    }
}
