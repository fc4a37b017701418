//! SubmitSettlementHandler - Command handler for submitting an amount.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::settlement::{Amount, Settlement, SettlementError};
use crate::ports::SettlementStore;

/// Command to submit (or resubmit) a settlement amount.
#[derive(Debug, Clone)]
pub struct SubmitSettlementCommand {
    pub amount: Amount,
}

/// Handler for settlement submissions.
pub struct SubmitSettlementHandler {
    store: Arc<dyn SettlementStore>,
}

impl SubmitSettlementHandler {
    pub fn new(store: Arc<dyn SettlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: SubmitSettlementCommand) -> Result<Settlement, SettlementError> {
        match self.store.submit(cmd.amount).await {
            Ok(settlement) => {
                info!(amount = %cmd.amount, "settlement submitted");
                Ok(settlement)
            }
            Err(e) => {
                warn!(amount = %cmd.amount, error = %e, "settlement submission refused");
                Err(e)
            }
        }
    }
}
