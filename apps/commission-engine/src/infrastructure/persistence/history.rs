//! In-memory calculation history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::domain::calculation::{CalculationHistoryRepository, CalculationItem, HistoryError};
use crate::domain::shared::{AccountId, OperationId, SubOperationId};

/// In-memory implementation of `CalculationHistoryRepository`.
#[derive(Debug)]
pub struct InMemoryCalculationHistory {
    items: RwLock<HashMap<SubOperationId, CalculationItem>>,
    available: AtomicBool,
}

impl Default for InMemoryCalculationHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCalculationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Get the number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Check if the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    fn check(&self) -> Result<(), HistoryError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(HistoryError::Unavailable {
                message: "calculation history offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl CalculationHistoryRepository for InMemoryCalculationHistory {
    async fn save_all(&self, items: &[CalculationItem]) -> Result<(), HistoryError> {
        self.check()?;
        let mut stored = self.items.write();
        for item in items {
            stored.entry(item.id.clone()).or_insert_with(|| item.clone());
        }
        Ok(())
    }

    async fn get(&self, id: &SubOperationId) -> Result<Option<CalculationItem>, HistoryError> {
        self.check()?;
        Ok(self.items.read().get(id).cloned())
    }

    async fn mark_charged(
        &self,
        id: &SubOperationId,
        succeeded: bool,
    ) -> Result<bool, HistoryError> {
        self.check()?;
        Ok(self
            .items
            .write()
            .get_mut(id)
            .is_some_and(|item| item.mark_charged(succeeded)))
    }

    async fn find_by_operation(
        &self,
        operation_id: &OperationId,
    ) -> Result<Vec<CalculationItem>, HistoryError> {
        self.check()?;
        let mut items: Vec<_> = self
            .items
            .read()
            .values()
            .filter(|item| &item.operation_id == operation_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(items)
    }

    async fn find_by_account(
        &self,
        account_id: &AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalculationItem>, HistoryError> {
        self.check()?;
        let mut items: Vec<_> = self
            .items
            .read()
            .values()
            .filter(|item| {
                &item.account_id == account_id && item.trading_day >= from && item.trading_day <= to
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| a.trading_day.cmp(&b.trading_day).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}
