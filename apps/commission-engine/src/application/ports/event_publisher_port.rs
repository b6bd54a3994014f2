//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing engine events to the message bus.

use async_trait::async_trait;

use crate::application::dto::CommissionEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Connection error.
    #[error("Event publish connection error: {message}")]
    ConnectionError {
        /// Error message.
        message: String,
    },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed {
        /// Error message.
        message: String,
    },
}

/// Port for publishing engine events.
#[async_trait]
pub trait EventPublisherPort: Send + Sync {
    /// Publish events in order.
    async fn publish_all(&self, events: Vec<CommissionEvent>) -> Result<(), EventPublishError>;

    /// Publish a single event.
    async fn publish(&self, event: CommissionEvent) -> Result<(), EventPublishError> {
        self.publish_all(vec![event]).await
    }
}

/// No-op event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisherPort for NoOpEventPublisher {
    async fn publish_all(&self, _events: Vec<CommissionEvent>) -> Result<(), EventPublishError> {
        Ok(())
    }
}
