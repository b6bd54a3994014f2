//! Operation Registry
//!
//! Exactly-once gate in front of every start command. An operation id is
//! admitted the first time it is seen; every redelivery is reported as not
//! new and must not be recalculated.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::operations::{Operation, OperationKind, OperationRepository, RegistryError};
use crate::domain::shared::OperationId;

/// Idempotency gate backed by an [`OperationRepository`].
pub struct OperationRegistry<O: OperationRepository> {
    repository: Arc<O>,
}

impl<O: OperationRepository> OperationRegistry<O> {
    /// Create a registry.
    #[must_use]
    pub const fn new(repository: Arc<O>) -> Self {
        Self { repository }
    }

    /// Register a started operation; `true` only for the first registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when storage cannot be reached.
    /// Callers must treat that as "unknown", never as "new".
    pub async fn is_new(
        &self,
        id: &OperationId,
        kind: OperationKind,
        payload: serde_json::Value,
    ) -> Result<bool, RegistryError> {
        let operation = Operation::start(id.clone(), kind, payload, Utc::now());
        self.repository.insert_if_absent(operation).await
    }

    /// Mark an operation finished.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when storage cannot be reached.
    pub async fn mark_finished(&self, id: &OperationId) -> Result<(), RegistryError> {
        self.repository.finish(id, Utc::now()).await
    }

    /// Current state of an operation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when storage cannot be reached.
    pub async fn get(&self, id: &OperationId) -> Result<Option<Operation>, RegistryError> {
        self.repository.find(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::operations::OperationStatus;
    use crate::infrastructure::persistence::InMemoryOperationRepository;

    #[tokio::test]
    async fn first_registration_is_new() {
        let registry = OperationRegistry::new(Arc::new(InMemoryOperationRepository::new()));
        let id = OperationId::new("op-1");

        assert!(registry.is_new(&id, OperationKind::DailyPnl, serde_json::Value::Null).await.unwrap());
        assert!(!registry.is_new(&id, OperationKind::DailyPnl, serde_json::Value::Null).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_registrations_admit_exactly_one() {
        let registry = Arc::new(OperationRegistry::new(Arc::new(
            InMemoryOperationRepository::new(),
        )));
        let id = OperationId::new("op-race");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                tokio::spawn(async move {
                    registry
                        .is_new(&id, OperationKind::OvernightSwap, serde_json::Value::Null)
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn mark_finished_updates_status() {
        let registry = OperationRegistry::new(Arc::new(InMemoryOperationRepository::new()));
        let id = OperationId::new("op-2");
        registry
            .is_new(&id, OperationKind::OnBehalf, serde_json::Value::Null)
            .await
            .unwrap();

        registry.mark_finished(&id).await.unwrap();

        let operation = registry.get(&id).await.unwrap().unwrap();
        assert_eq!(operation.status, OperationStatus::Finished);
    }

    #[tokio::test]
    async fn unavailable_storage_is_an_error() {
        let repository = Arc::new(InMemoryOperationRepository::new());
        repository.set_available(false);
        let registry = OperationRegistry::new(repository);

        let result = registry
            .is_new(&OperationId::new("op-3"), OperationKind::DailyPnl, serde_json::Value::Null)
            .await;
        assert!(matches!(result, Err(RegistryError::Unavailable { .. })));
    }
}
