//! Calculation History Repository Trait

use async_trait::async_trait;
use chrono::NaiveDate;

use super::item::CalculationItem;
use crate::domain::shared::{AccountId, OperationId, SubOperationId};

/// Errors raised by calculation history storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// Storage could not be reached.
    #[error("Calculation history unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Persistence for calculated items.
#[async_trait]
pub trait CalculationHistoryRepository: Send + Sync {
    /// Store items. Existing items with the same id are kept unchanged.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save_all(&self, items: &[CalculationItem]) -> Result<(), HistoryError>;

    /// Find one item by sub-operation id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn get(&self, id: &SubOperationId) -> Result<Option<CalculationItem>, HistoryError>;

    /// Record the downstream charge outcome of an item.
    ///
    /// Returns `true` if this call moved the item out of `Unknown`, `false`
    /// for unknown ids and repeated confirmations.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn mark_charged(&self, id: &SubOperationId, succeeded: bool)
    -> Result<bool, HistoryError>;

    /// All items of an operation, ordered by sub-operation id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_operation(
        &self,
        operation_id: &OperationId,
    ) -> Result<Vec<CalculationItem>, HistoryError>;

    /// Items of an account booked on trading days within `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn find_by_account(
        &self,
        account_id: &AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalculationItem>, HistoryError>;
}
