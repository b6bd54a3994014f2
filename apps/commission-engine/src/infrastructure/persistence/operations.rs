//! In-memory operation registry storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::domain::operations::{Operation, OperationRepository, RegistryError};
use crate::domain::shared::OperationId;

/// In-memory implementation of `OperationRepository`.
///
/// Insertion checks and writes under one write lock, so concurrent
/// deliveries of the same id admit exactly one.
#[derive(Debug)]
pub struct InMemoryOperationRepository {
    operations: RwLock<HashMap<OperationId, Operation>>,
    available: AtomicBool,
}

impl Default for InMemoryOperationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOperationRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            operations: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Get the number of operations in the repository.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.read().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.read().is_empty()
    }

    fn check(&self) -> Result<(), RegistryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RegistryError::Unavailable {
                message: "operation storage offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl OperationRepository for InMemoryOperationRepository {
    async fn insert_if_absent(&self, operation: Operation) -> Result<bool, RegistryError> {
        self.check()?;
        let mut operations = self.operations.write();
        if operations.contains_key(&operation.id) {
            return Ok(false);
        }
        operations.insert(operation.id.clone(), operation);
        Ok(true)
    }

    async fn finish(&self, id: &OperationId, at: DateTime<Utc>) -> Result<(), RegistryError> {
        self.check()?;
        if let Some(operation) = self.operations.write().get_mut(id) {
            operation.finish(at);
        }
        Ok(())
    }

    async fn find(&self, id: &OperationId) -> Result<Option<Operation>, RegistryError> {
        self.check()?;
        Ok(self.operations.read().get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::operations::{OperationKind, OperationStatus};

    fn operation(id: &str) -> Operation {
        Operation::start(
            OperationId::new(id),
            OperationKind::OrderExecution,
            serde_json::Value::Null,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_is_first_writer_wins() {
        let repo = InMemoryOperationRepository::new();

        assert!(repo.insert_if_absent(operation("op-1")).await.unwrap());
        assert!(!repo.insert_if_absent(operation("op-1")).await.unwrap());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_admit_one() {
        let repo = Arc::new(InMemoryOperationRepository::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.insert_if_absent(operation("op-1")).await.unwrap() })
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
    async fn finish_sets_status() {
        let repo = InMemoryOperationRepository::new();
        repo.insert_if_absent(operation("op-1")).await.unwrap();

        repo.finish(&OperationId::new("op-1"), Utc::now()).await.unwrap();

        let found = repo.find(&OperationId::new("op-1")).await.unwrap().unwrap();
        assert_eq!(found.status, OperationStatus::Finished);
        assert!(found.finished_at.is_some());
    }

    #[tokio::test]
    async fn unavailable_storage_errors() {
        let repo = InMemoryOperationRepository::new();
        repo.set_available(false);

        assert!(repo.insert_if_absent(operation("op-1")).await.is_err());
        assert!(repo.is_empty());
    }
}
