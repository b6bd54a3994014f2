//! In-memory reference data and rate settings store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::application::ports::{RateSettingsRepository, ReferenceDataError, ReferenceDataPort};
use crate::domain::rates::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate};
use crate::domain::reference::{Asset, AssetPair};

#[derive(Debug, Default)]
struct Contents {
    asset_pairs: Vec<AssetPair>,
    assets: Vec<Asset>,
    overnight_swap_rates: Vec<OvernightSwapRate>,
    order_execution_rates: Vec<OrderExecutionRate>,
    on_behalf_rates: Vec<OnBehalfRate>,
}

/// Source of reference data and store of rate settings.
///
/// Implements both [`ReferenceDataPort`] and [`RateSettingsRepository`], so
/// rate changes written through the settings service are what the next cache
/// rebuild reads.
#[derive(Debug)]
pub struct InMemoryReferenceStore {
    contents: RwLock<Contents>,
    available: AtomicBool,
}

impl Default for InMemoryReferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReferenceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: RwLock::new(Contents::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Replace the instrument list.
    pub fn set_asset_pairs(&self, pairs: Vec<AssetPair>) {
        self.contents.write().asset_pairs = pairs;
    }

    /// Replace the asset list.
    pub fn set_assets(&self, assets: Vec<Asset>) {
        self.contents.write().assets = assets;
    }

    /// Replace the overnight swap rates.
    pub fn set_overnight_swap_rates(&self, rates: Vec<OvernightSwapRate>) {
        self.contents.write().overnight_swap_rates = rates;
    }

    /// Replace the order execution rates.
    pub fn set_order_execution_rates(&self, rates: Vec<OrderExecutionRate>) {
        self.contents.write().order_execution_rates = rates;
    }

    /// Replace the on-behalf rates.
    pub fn set_on_behalf_rates(&self, rates: Vec<OnBehalfRate>) {
        self.contents.write().on_behalf_rates = rates;
    }

    fn check(&self) -> Result<(), ReferenceDataError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ReferenceDataError::Unavailable {
                message: "reference data store offline".to_string(),
            })
        }
    }
}

#[async_trait]
impl ReferenceDataPort for InMemoryReferenceStore {
    async fn asset_pairs(&self) -> Result<Vec<AssetPair>, ReferenceDataError> {
        self.check()?;
        Ok(self.contents.read().asset_pairs.clone())
    }

    async fn assets(&self) -> Result<Vec<Asset>, ReferenceDataError> {
        self.check()?;
        Ok(self.contents.read().assets.clone())
    }

    async fn overnight_swap_rates(&self) -> Result<Vec<OvernightSwapRate>, ReferenceDataError> {
        self.check()?;
        Ok(self.contents.read().overnight_swap_rates.clone())
    }

    async fn order_execution_rates(
        &self,
    ) -> Result<Vec<OrderExecutionRate>, ReferenceDataError> {
        self.check()?;
        Ok(self.contents.read().order_execution_rates.clone())
    }

    async fn on_behalf_rates(&self) -> Result<Vec<OnBehalfRate>, ReferenceDataError> {
        self.check()?;
        Ok(self.contents.read().on_behalf_rates.clone())
    }
}

#[async_trait]
impl RateSettingsRepository for InMemoryReferenceStore {
    async fn replace_overnight_swap_rates(
        &self,
        rates: Vec<OvernightSwapRate>,
    ) -> Result<(), ReferenceDataError> {
        self.check()?;
        self.set_overnight_swap_rates(rates);
        Ok(())
    }

    async fn replace_order_execution_rates(
        &self,
        rates: Vec<OrderExecutionRate>,
    ) -> Result<(), ReferenceDataError> {
        self.check()?;
        self.set_order_execution_rates(rates);
        Ok(())
    }

    async fn replace_on_behalf_rates(
        &self,
        rates: Vec<OnBehalfRate>,
    ) -> Result<(), ReferenceDataError> {
        self.check()?;
        self.set_on_behalf_rates(rates);
        Ok(())
    }
}
