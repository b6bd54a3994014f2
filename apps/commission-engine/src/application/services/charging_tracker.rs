//! Charging Tracker
//!
//! Correlates per-item charge confirmations into one [`ChargedEvent`] per
//! operation. Each session runs on its own task and owns its
//! [`TrackingSession`]; confirmations reach it through a channel found via
//! the sub-operation routing table.
//!
//! Routes are registered by [`ChargingTracker::track`] before the caller
//! publishes any per-item event, so a confirmation can never arrive for an
//! unregistered item.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::operation_registry::OperationRegistry;
use crate::application::dto::{ChargedEvent, CommissionEvent};
use crate::application::ports::EventPublisherPort;
use crate::domain::charging::{ChargingSummary, RecordOutcome, TrackingSession};
use crate::domain::operations::OperationRepository;
use crate::domain::shared::{OperationId, SubOperationId};
use crate::observability::metrics;

/// Whether a confirmation reached a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Delivered to the owning session.
    Routed,
    /// No live session owns this id.
    Unrouted,
}

#[derive(Debug)]
struct Confirmation {
    id: SubOperationId,
    succeeded: bool,
}

struct SessionHandle {
    sender: mpsc::Sender<Confirmation>,
    cancel: CancellationToken,
    items: Vec<SubOperationId>,
}

#[derive(Default)]
struct Routing {
    routes: HashMap<SubOperationId, OperationId>,
    sessions: HashMap<OperationId, SessionHandle>,
}

impl Routing {
    fn remove_session(&mut self, operation_id: &OperationId) -> Option<SessionHandle> {
        let handle = self.sessions.remove(operation_id)?;
        for id in &handle.items {
            self.routes.remove(id);
        }
        Some(handle)
    }
}

/// Tracks charging of every in-flight operation.
pub struct ChargingTracker<O: OperationRepository, E: EventPublisherPort> {
    registry: Arc<OperationRegistry<O>>,
    publisher: Arc<E>,
    routing: Arc<Mutex<Routing>>,
    timeout: Duration,
    buffer: usize,
}

impl<O, E> ChargingTracker<O, E>
where
    O: OperationRepository + 'static,
    E: EventPublisherPort + 'static,
{
    /// Create a tracker.
    #[must_use]
    pub fn new(
        registry: Arc<OperationRegistry<O>>,
        publisher: Arc<E>,
        timeout: Duration,
        buffer: usize,
    ) -> Self {
        Self {
            registry,
            publisher,
            routing: Arc::new(Mutex::new(Routing::default())),
            timeout,
            buffer: buffer.max(1),
        }
    }

    /// Register routes for a session and start awaiting its confirmations.
    ///
    /// Returns immediately; the summary is published from the session task.
    pub fn track(&self, mut session: TrackingSession) {
        let operation_id = session.operation_id().clone();
        let items: Vec<SubOperationId> = session.expected().iter().cloned().collect();

        if let Some(summary) = session.start() {
            tracing::info!(
                operation_id = %operation_id,
                total = summary.total,
                "Nothing to charge, completing immediately"
            );
            let registry = Arc::clone(&self.registry);
            let publisher = Arc::clone(&self.publisher);
            tokio::spawn(async move {
                finish(summary, registry.as_ref(), publisher.as_ref()).await;
            });
            return;
        }

        let deadline = Instant::now() + self.timeout;
        let (sender, receiver) = mpsc::channel(self.buffer);
        let cancel = CancellationToken::new();
        {
            let mut routing = self.routing.lock();
            if let Some(previous) = routing.remove_session(&operation_id) {
                previous.cancel.cancel();
            }
            for id in &items {
                routing.routes.insert(id.clone(), operation_id.clone());
            }
            routing.sessions.insert(
                operation_id.clone(),
                SessionHandle {
                    sender,
                    cancel: cancel.clone(),
                    items,
                },
            );
        }

        tracing::info!(
            operation_id = %operation_id,
            expected = session.remaining(),
            timeout_secs = self.timeout.as_secs(),
            "Charging session started"
        );

        let task = SessionTask {
            session,
            receiver,
            cancel,
            deadline,
            routing: Arc::clone(&self.routing),
        };
        let registry = Arc::clone(&self.registry);
        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            if let Some(summary) = task.run().await {
                finish(summary, registry.as_ref(), publisher.as_ref()).await;
            }
        });
    }

    /// Forward a charge confirmation to the session that owns it.
    pub async fn confirm(&self, id: &SubOperationId, succeeded: bool) -> ConfirmOutcome {
        let sender = {
            let routing = self.routing.lock();
            routing
                .routes
                .get(id)
                .and_then(|operation_id| routing.sessions.get(operation_id))
                .map(|handle| handle.sender.clone())
        };

        let Some(sender) = sender else {
            tracing::debug!(sub_operation_id = %id, "Confirmation for untracked item ignored");
            return ConfirmOutcome::Unrouted;
        };

        let confirmation = Confirmation {
            id: id.clone(),
            succeeded,
        };
        if sender.send(confirmation).await.is_err() {
            // Session completed between lookup and send.
            return ConfirmOutcome::Unrouted;
        }
        ConfirmOutcome::Routed
    }

    /// Stop tracking an operation without publishing a summary.
    pub fn abandon(&self, operation_id: &OperationId) -> bool {
        let removed = self.routing.lock().remove_session(operation_id);
        match removed {
            Some(handle) => {
                handle.cancel.cancel();
                tracing::warn!(operation_id = %operation_id, "Charging session abandoned");
                true
            }
            None => false,
        }
    }

    /// Number of sessions awaiting confirmations.
    #[must_use]
    pub fn active_sessions(&self) -> usize {
        self.routing.lock().sessions.len()
    }
}

struct SessionTask {
    session: TrackingSession,
    receiver: mpsc::Receiver<Confirmation>,
    cancel: CancellationToken,
    deadline: Instant,
    routing: Arc<Mutex<Routing>>,
}

impl SessionTask {
    async fn run(mut self) -> Option<ChargingSummary> {
        let deadline = tokio::time::sleep_until(self.deadline);
        tokio::pin!(deadline);

        let summary = loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => break None,
                confirmation = self.receiver.recv() => {
                    // The sender only goes away on abandon or replacement.
                    let Some(confirmation) = confirmation else {
                        break None;
                    };
                    match self.session.record(&confirmation.id, confirmation.succeeded) {
                        RecordOutcome::Completed(summary) => break Some(summary),
                        RecordOutcome::Recorded { remaining } => {
                            tracing::debug!(
                                sub_operation_id = %confirmation.id,
                                remaining,
                                "Charge confirmation recorded"
                            );
                        }
                        RecordOutcome::Duplicate => {
                            tracing::debug!(
                                sub_operation_id = %confirmation.id,
                                "Duplicate charge confirmation ignored"
                            );
                        }
                        RecordOutcome::Ignored => {}
                    }
                }
                () = &mut deadline => {
                    tracing::warn!(
                        operation_id = %self.session.operation_id(),
                        unconfirmed = self.session.remaining(),
                        "Charging session timed out"
                    );
                    break self.session.expire();
                }
            }
        };

        if summary.is_some() {
            self.routing
                .lock()
                .remove_session(self.session.operation_id());
        }
        summary
    }
}

async fn finish<O, E>(summary: ChargingSummary, registry: &OperationRegistry<O>, publisher: &E)
where
    O: OperationRepository,
    E: EventPublisherPort,
{
    let operation_id = summary.operation_id.clone();
    metrics::record_charging_completed(summary.kind, summary.timed_out);
    tracing::info!(
        operation_id = %operation_id,
        kind = %summary.kind,
        total = summary.total,
        failed = summary.failed,
        unconfirmed = summary.unconfirmed,
        timed_out = summary.timed_out,
        "Charging completed"
    );

    if let Err(e) = publisher
        .publish(CommissionEvent::Charged(ChargedEvent::from(summary)))
        .await
    {
        tracing::error!(operation_id = %operation_id, error = %e, "Failed to publish charged event");
    }

    if let Err(e) = registry.mark_finished(&operation_id).await {
        tracing::error!(operation_id = %operation_id, error = %e, "Failed to mark operation finished");
    }
}
