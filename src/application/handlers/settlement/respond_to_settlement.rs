//! RespondToSettlementHandler - Command handler for approving or rejecting.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::settlement::{Decision, Settlement, SettlementError};
use crate::ports::SettlementStore;

/// Command to approve or reject the current settlement.
#[derive(Debug, Clone)]
pub struct RespondToSettlementCommand {
    pub decision: Decision,
    pub comment: Option<String>,
}

/// Handler for settlement responses.
pub struct RespondToSettlementHandler {
    store: Arc<dyn SettlementStore>,
}

impl RespondToSettlementHandler {
    pub fn new(store: Arc<dyn SettlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RespondToSettlementCommand,
    ) -> Result<Settlement, SettlementError> {
        let decision = cmd.decision;
        match self.store.respond(decision, cmd.comment).await {
            Ok(settlement) => {
                info!(%decision, stage = %settlement.stage(), "settlement responded");
                Ok(settlement)
            }
            Err(e) => {
                warn!(%decision, error = %e, "settlement response refused");
                Err(e)
            }
        }
    }
}
