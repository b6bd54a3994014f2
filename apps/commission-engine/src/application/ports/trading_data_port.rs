//! Trading Data Port (Driven Port)
//!
//! Read-only access to the trading platform: open positions, accounts and
//! on-behalf action counts.

use async_trait::async_trait;

use crate::domain::calculation::{AccountSnapshot, PositionSnapshot};
use crate::domain::shared::{AccountId, OrderId};

/// Trading data errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradingDataError {
    /// The trading platform could not be reached.
    #[error("Trading data unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

/// Port for reading trading platform snapshots.
#[async_trait]
pub trait TradingDataPort: Send + Sync {
    /// All currently open positions.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot be queried.
    async fn open_positions(&self) -> Result<Vec<PositionSnapshot>, TradingDataError>;

    /// Look up an account.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot be queried.
    async fn account(&self, id: &AccountId) -> Result<Option<AccountSnapshot>, TradingDataError>;

    /// Number of actions taken on behalf of the client for an order.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot be queried.
    async fn on_behalf_action_count(&self, order_id: &OrderId) -> Result<u32, TradingDataError>;
}
