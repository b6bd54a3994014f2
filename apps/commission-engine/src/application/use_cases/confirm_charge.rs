//! Confirm Charge Use Case

use std::sync::Arc;

use crate::application::ports::{EventPublisherPort, HandleOutcome, HandlerError};
use crate::application::services::{ChargingTracker, ConfirmOutcome};
use crate::domain::calculation::CalculationHistoryRepository;
use crate::domain::operations::OperationRepository;
use crate::domain::shared::SubOperationId;

/// Records a downstream charge confirmation.
///
/// The history transition is the durable record and happens first; the
/// tracker only sees confirmations that storage accepted.
pub struct ConfirmChargeUseCase<H, O, E>
where
    H: CalculationHistoryRepository,
    O: OperationRepository + 'static,
    E: EventPublisherPort + 'static,
{
    history: Arc<H>,
    tracker: Arc<ChargingTracker<O, E>>,
}

impl<H, O, E> ConfirmChargeUseCase<H, O, E>
where
    H: CalculationHistoryRepository,
    O: OperationRepository + 'static,
    E: EventPublisherPort + 'static,
{
    /// Create a new ConfirmChargeUseCase.
    pub const fn new(history: Arc<H>, tracker: Arc<ChargingTracker<O, E>>) -> Self {
        Self { history, tracker }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Transient`] when history storage is unavailable.
    pub async fn execute(
        &self,
        sub_operation_id: &SubOperationId,
        succeeded: bool,
    ) -> Result<HandleOutcome, HandlerError> {
        let transitioned = self.history.mark_charged(sub_operation_id, succeeded).await?;
        if !transitioned {
            tracing::debug!(
                sub_operation_id = %sub_operation_id,
                "Charge status already recorded or item unknown"
            );
        }

        if self.tracker.confirm(sub_operation_id, succeeded).await == ConfirmOutcome::Unrouted {
            tracing::debug!(
                sub_operation_id = %sub_operation_id,
                "No active charging session for confirmation"
            );
        }

        Ok(HandleOutcome::Acknowledged)
    }
}
