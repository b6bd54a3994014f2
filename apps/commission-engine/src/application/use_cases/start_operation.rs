//! Start Operation Use Case
//!
//! Shared workflow of every start command:
//!
//! 1. validate the command
//! 2. admit the operation id through the registry (duplicates stop here)
//! 3. calculate items; a [`CalculationError`] publishes a start-failed event
//! 4. persist items to calculation history
//! 5. register a charging session for the successful items
//! 6. publish one internal event per successful item, then the calculated event
//!
//! Charging completes asynchronously and never delays acknowledgement.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::application::dto::{CalculatedEvent, CommissionEvent, StartCommand, StartFailedEvent};
use crate::application::engines::CalculationEngine;
use crate::application::ports::{
    EventPublishError, EventPublisherPort, HandleOutcome, HandlerError,
};
use crate::application::services::{ChargingTracker, OperationRegistry};
use crate::domain::calculation::{CalculationHistoryRepository, CalculationItem};
use crate::domain::charging::TrackingSession;
use crate::domain::operations::{OperationKind, OperationRepository};
use crate::domain::shared::OperationId;
use crate::observability::metrics;

/// Use case handling one kind of start command.
pub struct StartOperationUseCase<En, O, H, E>
where
    En: CalculationEngine,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
{
    engine: Arc<En>,
    registry: Arc<OperationRegistry<O>>,
    history: Arc<H>,
    tracker: Arc<ChargingTracker<O, E>>,
    publisher: Arc<E>,
}

impl<En, O, H, E> StartOperationUseCase<En, O, H, E>
where
    En: CalculationEngine,
    En::Command: StartCommand + Serialize,
    O: OperationRepository + 'static,
    H: CalculationHistoryRepository,
    E: EventPublisherPort + 'static,
{
    /// Create a new StartOperationUseCase.
    pub const fn new(
        engine: Arc<En>,
        registry: Arc<OperationRegistry<O>>,
        history: Arc<H>,
        tracker: Arc<ChargingTracker<O, E>>,
        publisher: Arc<E>,
    ) -> Self {
        Self {
            engine,
            registry,
            history,
            tracker,
            publisher,
        }
    }

    /// Execute the use case.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Transient`] only when the registry is
    /// unavailable, before anything has been calculated.
    pub async fn execute(&self, command: &En::Command) -> Result<HandleOutcome, HandlerError> {
        let operation_id = command.operation_id();
        let kind = command.kind();

        // 1. Validate
        if let Err(e) = command.validate() {
            tracing::warn!(operation_id = %operation_id, kind = %kind, error = %e, "Command rejected");
            metrics::record_operation(kind, "rejected");
            return Ok(HandleOutcome::Rejected {
                reason: e.to_string(),
            });
        }

        // 2. Idempotency gate
        let payload = serde_json::to_value(command).unwrap_or(serde_json::Value::Null);
        if !self.registry.is_new(operation_id, kind, payload).await? {
            tracing::info!(operation_id = %operation_id, kind = %kind, "Duplicate operation ignored");
            metrics::record_operation(kind, "duplicate");
            return Ok(HandleOutcome::Duplicate);
        }
        tracing::info!(operation_id = %operation_id, kind = %kind, "Operation started");

        // 3. Calculate
        let items = match self.engine.calculate(command).await {
            Ok(items) => items,
            Err(e) => return Ok(self.fail_start(operation_id, kind, e.to_string()).await),
        };

        let total = items.len();
        let failed = items.iter().filter(|item| !item.is_success).count();
        metrics::record_items(kind, total - failed, failed);

        // 4. Persist
        if let Err(e) = self.history.save_all(&items).await {
            return Ok(self.fail_start(operation_id, kind, e.to_string()).await);
        }

        // 5. Track. Routes must exist before any item event is published; a
        // session with nothing to await completes once the results are out.
        let session = TrackingSession::new(
            operation_id.clone(),
            kind,
            total,
            failed,
            items
                .iter()
                .filter(|item| item.is_success)
                .map(|item| item.id.clone()),
        );
        let deferred = if failed < total {
            self.tracker.track(session);
            None
        } else {
            Some(session)
        };

        // 6. Publish
        if let Err(e) = self.publish_results(operation_id, kind, &items, failed).await {
            self.tracker.abandon(operation_id);
            return Ok(self.fail_start(operation_id, kind, e.to_string()).await);
        }
        if let Some(session) = deferred {
            self.tracker.track(session);
        }

        tracing::info!(
            operation_id = %operation_id,
            kind = %kind,
            total,
            failed,
            "Operation calculated"
        );
        metrics::record_operation(kind, "calculated");
        Ok(HandleOutcome::Completed { total, failed })
    }

    async fn publish_results(
        &self,
        operation_id: &OperationId,
        kind: OperationKind,
        items: &[CalculationItem],
        failed: usize,
    ) -> Result<(), EventPublishError> {
        let mut events: Vec<CommissionEvent> =
            items.iter().filter_map(CommissionEvent::for_item).collect();
        events.push(CommissionEvent::Calculated(CalculatedEvent {
            kind,
            operation_id: operation_id.clone(),
            total: items.len(),
            failed,
            created_at: Utc::now(),
        }));
        self.publisher.publish_all(events).await
    }

    async fn fail_start(
        &self,
        operation_id: &OperationId,
        kind: OperationKind,
        fail_reason: String,
    ) -> HandleOutcome {
        tracing::error!(
            operation_id = %operation_id,
            kind = %kind,
            reason = %fail_reason,
            "Operation failed to start"
        );
        metrics::record_operation(kind, "start_failed");

        let event = CommissionEvent::StartFailed(StartFailedEvent {
            kind,
            operation_id: operation_id.clone(),
            fail_reason: fail_reason.clone(),
            created_at: Utc::now(),
        });
        if let Err(e) = self.publisher.publish(event).await {
            tracing::error!(operation_id = %operation_id, error = %e, "Failed to publish start-failed event");
        }
        if let Err(e) = self.registry.mark_finished(operation_id).await {
            tracing::error!(operation_id = %operation_id, error = %e, "Failed to mark operation finished");
        }

        HandleOutcome::StartFailed {
            reason: fail_reason,
        }
    }
}
