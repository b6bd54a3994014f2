//! Message Dispatcher
//!
//! Consumes the bus, handing each envelope to the inbound handler on its own
//! task. Concurrency is bounded by a semaphore. A transient handler error
//! schedules a redelivery after an exponential backoff until the configured
//! attempt limit, after which the envelope is dead-lettered.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::bus::{Envelope, InMemoryMessageBus};
use crate::application::ports::{HandleOutcome, HandlerError, InboundHandlerPort};
use crate::config::MessagingConfig;
use crate::observability::metrics;

/// Dispatcher errors.
#[derive(Debug, thiserror::Error)]
pub enum DispatcherError {
    /// Another dispatcher already owns the bus receiver.
    #[error("message bus already has a consumer")]
    AlreadyConsuming,
}

/// Bus consumer driving an [`InboundHandlerPort`].
pub struct MessageDispatcher<H: InboundHandlerPort + 'static> {
    handler: Arc<H>,
    bus: Arc<InMemoryMessageBus>,
    config: MessagingConfig,
}

impl<H: InboundHandlerPort + 'static> MessageDispatcher<H> {
    /// Create a new dispatcher.
    pub const fn new(handler: Arc<H>, bus: Arc<InMemoryMessageBus>, config: MessagingConfig) -> Self {
        Self {
            handler,
            bus,
            config,
        }
    }

    /// Consume messages until `cancel` fires, then wait for in-flight handlers.
    ///
    /// # Errors
    ///
    /// Returns [`DispatcherError::AlreadyConsuming`] if the bus receiver was
    /// already taken.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), DispatcherError> {
        let mut receiver = self
            .bus
            .take_receiver()
            .ok_or(DispatcherError::AlreadyConsuming)?;
        let permits = Arc::new(Semaphore::new(self.config.handler_concurrency.max(1)));
        let tasks = TaskTracker::new();

        tracing::info!(
            concurrency = self.config.handler_concurrency,
            max_attempts = self.config.max_delivery_attempts,
            "Message dispatcher started"
        );

        loop {
            let envelope = tokio::select! {
                () = cancel.cancelled() => break,
                envelope = receiver.recv() => match envelope {
                    Some(envelope) => envelope,
                    None => break,
                },
            };

            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };
            let delivery = Delivery {
                handler: Arc::clone(&self.handler),
                bus: Arc::clone(&self.bus),
                config: self.config.clone(),
                cancel: cancel.clone(),
            };
            tasks.spawn(async move {
                delivery.deliver(envelope, permit).await;
            });
        }

        tasks.close();
        tasks.wait().await;
        tracing::info!("Message dispatcher stopped");
        Ok(())
    }
}

struct Delivery<H: InboundHandlerPort> {
    handler: Arc<H>,
    bus: Arc<InMemoryMessageBus>,
    config: MessagingConfig,
    cancel: CancellationToken,
}

impl<H: InboundHandlerPort> Delivery<H> {
    async fn deliver(self, envelope: Envelope, permit: tokio::sync::OwnedSemaphorePermit) {
        let result = self.handler.handle(envelope.message.clone()).await;
        drop(permit);

        match result {
            Ok(outcome) => log_outcome(&envelope, &outcome),
            Err(HandlerError::Transient { message }) => self.retry(envelope, message).await,
        }
    }

    async fn retry(&self, envelope: Envelope, reason: String) {
        let name = envelope.message.name();
        if envelope.attempt >= self.config.max_delivery_attempts {
            tracing::error!(
                message_id = %envelope.id,
                message = name,
                attempt = envelope.attempt,
                reason = %reason,
                "Delivery attempts exhausted, dead-lettering message"
            );
            metrics::record_dead_letter(name);
            self.bus.dead_letter(envelope, reason);
            return;
        }

        let delay = self.config.redelivery_delay(envelope.attempt);
        tracing::warn!(
            message_id = %envelope.id,
            message = name,
            attempt = envelope.attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            reason = %reason,
            "Transient failure, scheduling redelivery"
        );
        metrics::record_redelivery(name);

        tokio::select! {
            () = self.cancel.cancelled() => {
                tracing::info!(message_id = %envelope.id, "Shutdown before redelivery, message dropped");
            }
            () = tokio::time::sleep(delay) => {
                if let Err(e) = self.bus.redeliver(envelope) {
                    tracing::error!(error = %e, "Redelivery failed");
                }
            }
        }
    }
}

fn log_outcome(envelope: &Envelope, outcome: &HandleOutcome) {
    match outcome {
        HandleOutcome::Completed { total, failed } => tracing::debug!(
            message_id = %envelope.id,
            total,
            failed,
            "Message handled"
        ),
        HandleOutcome::Rejected { reason } | HandleOutcome::StartFailed { reason } => {
            tracing::warn!(message_id = %envelope.id, reason = %reason, "Message acknowledged without effect");
        }
        HandleOutcome::Duplicate | HandleOutcome::Acknowledged => {
            tracing::debug!(message_id = %envelope.id, outcome = ?outcome, "Message acknowledged");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::application::dto::InboundMessage;
    use crate::domain::reference::ReferenceDataKind;

    struct FlakyHandler {
        calls: AtomicU32,
        failures: u32,
    }

    #[async_trait]
    impl InboundHandlerPort for FlakyHandler {
        async fn handle(&self, _message: InboundMessage) -> Result<HandleOutcome, HandlerError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                return Err(HandlerError::transient("store offline"));
            }
            Ok(HandleOutcome::Acknowledged)
        }
    }

    fn config(max_attempts: u32) -> MessagingConfig {
        MessagingConfig {
            max_delivery_attempts: max_attempts,
            redelivery_backoff_ms: 10,
            max_redelivery_backoff_ms: 100,
            handler_concurrency: 4,
        }
    }

    async fn run_until<F: Fn() -> bool>(
        handler: Arc<FlakyHandler>,
        bus: Arc<InMemoryMessageBus>,
        max_attempts: u32,
        done: F,
    ) {
        let dispatcher = MessageDispatcher::new(handler, Arc::clone(&bus), config(max_attempts));
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        let running = tokio::spawn(async move { dispatcher.run(stop).await });

        for _ in 0..500 {
            if done() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
        running.await.unwrap().unwrap();
    }

    fn message() -> InboundMessage {
        InboundMessage::ReferenceDataChanged {
            kind: ReferenceDataKind::Currency,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failure_is_redelivered() {
        let handler = Arc::new(FlakyHandler {
            calls: AtomicU32::new(0),
            failures: 2,
        });
        let bus = Arc::new(InMemoryMessageBus::new());
        bus.publish(message()).unwrap();

        let observed = Arc::clone(&handler);
        run_until(Arc::clone(&handler), Arc::clone(&bus), 5, move || {
            observed.calls.load(Ordering::SeqCst) >= 3
        })
        .await;

        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
        assert!(bus.dead_letters().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_attempts_are_dead_lettered() {
        let handler = Arc::new(FlakyHandler {
            calls: AtomicU32::new(0),
            failures: u32::MAX,
        });
        let bus = Arc::new(InMemoryMessageBus::new());
        bus.publish(message()).unwrap();

        let observed = Arc::clone(&bus);
        run_until(Arc::clone(&handler), Arc::clone(&bus), 3, move || {
            !observed.dead_letters().is_empty()
        })
        .await;

        let dead = bus.dead_letters();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].envelope.attempt, 3);
        assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn second_dispatcher_cannot_consume() {
        let handler = Arc::new(FlakyHandler {
            calls: AtomicU32::new(0),
            failures: 0,
        });
        let bus = Arc::new(InMemoryMessageBus::new());
        bus.take_receiver();

        let dispatcher = MessageDispatcher::new(handler, bus, config(1));
        let result = dispatcher.run(CancellationToken::new()).await;

        assert!(matches!(result, Err(DispatcherError::AlreadyConsuming)));
    }
}
