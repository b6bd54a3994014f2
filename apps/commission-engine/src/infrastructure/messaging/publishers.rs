//! Outbound event publishers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, broadcast};

use crate::application::dto::{ChargedEvent, CommissionEvent};
use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::shared::OperationId;

// =============================================================================
// Broadcast Publisher
// =============================================================================

/// Publishes events to every subscriber of a tokio broadcast channel.
///
/// Slow subscribers that fall more than `capacity` events behind observe a
/// lag error on their receiver; the publisher never blocks.
#[derive(Debug)]
pub struct BroadcastEventPublisher {
    sender: broadcast::Sender<CommissionEvent>,
}

impl BroadcastEventPublisher {
    /// Create a publisher with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to published events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CommissionEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl EventPublisherPort for BroadcastEventPublisher {
    async fn publish_all(&self, events: Vec<CommissionEvent>) -> Result<(), EventPublishError> {
        for event in events {
            tracing::debug!(
                event = event.name(),
                operation_id = %event.operation_id(),
                "Publishing event"
            );
            if self.sender.send(event).is_err() {
                tracing::trace!("No event subscribers");
            }
        }
        Ok(())
    }
}

// =============================================================================
// Recording Publisher
// =============================================================================

/// Keeps every published event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<CommissionEvent>>,
    published: Notify,
    failing: AtomicBool,
}

impl RecordingEventPublisher {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following publish fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All events in publication order.
    #[must_use]
    pub fn events(&self) -> Vec<CommissionEvent> {
        self.events.lock().clone()
    }

    /// Published charged events.
    #[must_use]
    pub fn charged_events(&self) -> Vec<ChargedEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                CommissionEvent::Charged(charged) => Some(charged.clone()),
                _ => None,
            })
            .collect()
    }

    /// Wait until a charged event for `operation_id` is published.
    ///
    /// Returns `None` if none arrives within `timeout`.
    pub async fn wait_for_charged(
        &self,
        operation_id: &OperationId,
        timeout: Duration,
    ) -> Option<ChargedEvent> {
        tokio::time::timeout(timeout, async {
            loop {
                let published = self.published.notified();
                if let Some(charged) = self
                    .charged_events()
                    .into_iter()
                    .find(|charged| &charged.operation_id == operation_id)
                {
                    return charged;
                }
                published.await;
            }
        })
        .await
        .ok()
    }
}

#[async_trait]
impl EventPublisherPort for RecordingEventPublisher {
    async fn publish_all(&self, events: Vec<CommissionEvent>) -> Result<(), EventPublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventPublishError::PublishFailed {
                message: "publisher rejected events".to_string(),
            });
        }
        self.events.lock().extend(events);
        self.published.notify_waiters();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::application::dto::StartFailedEvent;
    use crate::domain::operations::OperationKind;

    fn start_failed(op: &str) -> CommissionEvent {
        CommissionEvent::StartFailed(StartFailedEvent {
            kind: OperationKind::OvernightSwap,
            operation_id: OperationId::new(op),
            fail_reason: "positions unavailable".to_string(),
            created_at: Utc::now(),
        })
    }

    fn charged(op: &str) -> CommissionEvent {
        CommissionEvent::Charged(ChargedEvent {
            kind: OperationKind::OvernightSwap,
            operation_id: OperationId::new(op),
            total: 2,
            failed: 0,
            unconfirmed: 0,
            timed_out: false,
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let publisher = BroadcastEventPublisher::new(16);
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();

        publisher.publish(start_failed("op-1")).await.unwrap();

        assert_eq!(first.recv().await.unwrap().operation_id().as_str(), "op-1");
        assert_eq!(second.recv().await.unwrap().operation_id().as_str(), "op-1");
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_succeeds() {
        let publisher = BroadcastEventPublisher::new(16);

        assert!(publisher.publish(start_failed("op-1")).await.is_ok());
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn failing_recorder_keeps_nothing() {
        let publisher = RecordingEventPublisher::new();
        publisher.set_failing(true);

        assert!(publisher.publish(start_failed("op-1")).await.is_err());
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn wait_for_charged_sees_later_publish() {
        let publisher = std::sync::Arc::new(RecordingEventPublisher::new());
        let background = std::sync::Arc::clone(&publisher);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            background.publish(charged("op-1")).await.unwrap();
        });

        let found = publisher
            .wait_for_charged(&OperationId::new("op-1"), Duration::from_secs(5))
            .await;

        assert_eq!(found.unwrap().total, 2);
    }
}
