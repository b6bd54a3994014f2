//! Operation Repository Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::Operation;
use crate::domain::shared::OperationId;

/// Errors raised by operation storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Storage could not be reached; the caller should retry later.
    #[error("Operation storage unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Persistence for operation records.
///
/// Implemented by infrastructure adapters.
#[async_trait]
pub trait OperationRepository: Send + Sync {
    /// Insert the operation unless one with the same id exists.
    ///
    /// Returns `true` only for the caller whose insert created the record.
    /// Must be atomic with respect to concurrent callers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] if storage cannot be reached.
    async fn insert_if_absent(&self, operation: Operation) -> Result<bool, RegistryError>;

    /// Mark the operation finished. Unknown or already finished ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] if storage cannot be reached.
    async fn finish(&self, id: &OperationId, at: DateTime<Utc>) -> Result<(), RegistryError>;

    /// Find an operation by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] if storage cannot be reached.
    async fn find(&self, id: &OperationId) -> Result<Option<Operation>, RegistryError>;
}
