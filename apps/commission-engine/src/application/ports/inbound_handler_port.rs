//! Inbound Handler Port (Driver Port)
//!
//! How the message bus drives the engine. The bus acknowledges a message on
//! `Ok` and redelivers it on `Err`.

use async_trait::async_trait;

use super::event_publisher_port::EventPublishError;
use super::reference_data_port::ReferenceDataError;
use crate::application::dto::InboundMessage;
use crate::domain::calculation::HistoryError;
use crate::domain::operations::RegistryError;

/// Result of handling a message that should be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// Items calculated and published.
    Completed {
        /// Items calculated.
        total: usize,
        /// Items that failed calculation.
        failed: usize,
    },
    /// Operation id was already registered; nothing was done.
    Duplicate,
    /// Command failed validation.
    Rejected {
        /// Validation message.
        reason: String,
    },
    /// Calculation could not start; a start-failed event was published.
    StartFailed {
        /// Failure description.
        reason: String,
    },
    /// Confirmation or notification processed.
    Acknowledged,
}

/// Failure that must not be acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// Infrastructure was unavailable; redelivery may succeed.
    #[error("Transient failure: {message}")]
    Transient {
        /// Error message.
        message: String,
    },
}

impl HandlerError {
    /// Wrap any displayable error as transient.
    #[must_use]
    pub fn transient(err: impl std::fmt::Display) -> Self {
        Self::Transient {
            message: err.to_string(),
        }
    }
}

impl From<RegistryError> for HandlerError {
    fn from(err: RegistryError) -> Self {
        Self::transient(err)
    }
}

impl From<HistoryError> for HandlerError {
    fn from(err: HistoryError) -> Self {
        Self::transient(err)
    }
}

impl From<ReferenceDataError> for HandlerError {
    fn from(err: ReferenceDataError) -> Self {
        Self::transient(err)
    }
}

impl From<EventPublishError> for HandlerError {
    fn from(err: EventPublishError) -> Self {
        Self::transient(err)
    }
}

/// Port through which inbound messages enter the application.
#[async_trait]
pub trait InboundHandlerPort: Send + Sync {
    /// Handle one delivery of a message.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Transient`] when the message should be redelivered.
    async fn handle(&self, message: InboundMessage) -> Result<HandleOutcome, HandlerError>;
}
