//! In-memory message bus.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::dto::InboundMessage;

/// One delivery of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Broker-assigned message id, stable across redeliveries.
    pub id: Uuid,
    /// Delivery attempt, starting at 1.
    pub attempt: u32,
    /// The message itself.
    pub message: InboundMessage,
    /// When the message was first enqueued.
    pub enqueued_at: DateTime<Utc>,
}

impl Envelope {
    fn new(message: InboundMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            attempt: 1,
            message,
            enqueued_at: Utc::now(),
        }
    }
}

/// A message that exhausted its delivery attempts.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    /// Last delivery of the message.
    pub envelope: Envelope,
    /// Error of the last attempt.
    pub reason: String,
}

/// Bus errors.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// The consumer side has shut down.
    #[error("message bus closed")]
    Closed,
    /// Raw payload was not a valid inbound message.
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Unbounded queue of inbound messages with a single consumer.
#[derive(Debug)]
pub struct InMemoryMessageBus {
    sender: mpsc::UnboundedSender<Envelope>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Envelope>>>,
    dead_letters: Mutex<Vec<DeadLetter>>,
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(Some(receiver)),
            dead_letters: Mutex::new(Vec::new()),
        }
    }

    /// Enqueue a message for its first delivery.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Closed`] once the consumer is gone.
    pub fn publish(&self, message: impl Into<InboundMessage>) -> Result<Uuid, BusError> {
        let envelope = Envelope::new(message.into());
        let id = envelope.id;
        self.sender.send(envelope).map_err(|_| BusError::Closed)?;
        Ok(id)
    }

    /// Parse a JSON payload and enqueue it.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Malformed`] for payloads that are not inbound
    /// messages, or [`BusError::Closed`] once the consumer is gone.
    pub fn publish_json(&self, payload: &str) -> Result<Uuid, BusError> {
        let message: InboundMessage = serde_json::from_str(payload)?;
        self.publish(message)
    }

    /// Enqueue the next delivery attempt of an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Closed`] once the consumer is gone.
    pub fn redeliver(&self, mut envelope: Envelope) -> Result<(), BusError> {
        envelope.attempt += 1;
        self.sender.send(envelope).map_err(|_| BusError::Closed)
    }

    /// Take the consumer side. Only the first call returns a receiver.
    pub fn take_receiver(&self) -> Option<mpsc::UnboundedReceiver<Envelope>> {
        self.receiver.lock().take()
    }

    /// Park a message that will not be delivered again.
    pub fn dead_letter(&self, envelope: Envelope, reason: impl Into<String>) {
        self.dead_letters.lock().push(DeadLetter {
            envelope,
            reason: reason.into(),
        });
    }

    /// Messages parked so far.
    #[must_use]
    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters.lock().clone()
    }
}
