//! In-memory trading platform.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{TradingDataError, TradingDataPort};
use crate::domain::calculation::{AccountSnapshot, PositionSnapshot};
use crate::domain::shared::{AccountId, OrderId};

/// Positions, accounts and on-behalf action counts held in memory.
#[derive(Debug)]
pub struct InMemoryTradingData {
    positions: RwLock<Vec<PositionSnapshot>>,
    accounts: RwLock<HashMap<AccountId, AccountSnapshot>>,
    on_behalf_actions: RwLock<HashMap<OrderId, u32>>,
    available: AtomicBool,
}

impl Default for InMemoryTradingData {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTradingData {
    /// Create an empty platform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: RwLock::new(Vec::new()),
            accounts: RwLock::new(HashMap::new()),
            on_behalf_actions: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Replace the open positions.
    pub fn set_positions(&self, positions: Vec<PositionSnapshot>) {
        *self.positions.write() = positions;
    }

    /// Add or replace an account.
    pub fn add_account(&self, account: AccountSnapshot) {
        self.accounts.write().insert(account.id.clone(), account);
    }

    /// Set the number of on-behalf actions taken on an order.
    pub fn set_on_behalf_actions(&self, order_id: OrderId, count: u32) {
        self.on_behalf_actions.write().insert(order_id, count);
    }

    fn check(&self) -> Result<(), TradingDataError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TradingDataError::Unavailable {
                message: "trading platform offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl TradingDataPort for InMemoryTradingData {
    async fn open_positions(&self) -> Result<Vec<PositionSnapshot>, TradingDataError> {
        self.check()?;
        Ok(self.positions.read().clone())
    }

    async fn account(&self, id: &AccountId) -> Result<Option<AccountSnapshot>, TradingDataError> {
        self.check()?;
        Ok(self.accounts.read().get(id).cloned())
    }

    async fn on_behalf_action_count(&self, order_id: &OrderId) -> Result<u32, TradingDataError> {
        self.check()?;
        Ok(self
            .on_behalf_actions
            .read()
            .get(order_id)
            .copied()
            .unwrap_or_default())
    }
}
