//! Reference data loading and rate settings administration.

use std::sync::Arc;

use crate::application::caches::ReferenceCaches;
use crate::application::ports::{RateSettingsRepository, ReferenceDataError, ReferenceDataPort};
use crate::domain::rates::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate};
use crate::domain::reference::{CacheKind, ReferenceDataKind};

/// Loads reference data into the caches and rebuilds them on change.
pub struct ReferenceDataService<R: ReferenceDataPort> {
    source: Arc<R>,
    caches: Arc<ReferenceCaches>,
}

impl<R: ReferenceDataPort> ReferenceDataService<R> {
    /// Create a service.
    #[must_use]
    pub const fn new(source: Arc<R>, caches: Arc<ReferenceCaches>) -> Self {
        Self { source, caches }
    }

    /// Load every cache.
    ///
    /// # Errors
    ///
    /// Returns error if any data set cannot be fetched. Caches loaded before
    /// the failure keep their new generation.
    pub async fn initialize(&self) -> Result<(), ReferenceDataError> {
        for cache in [CacheKind::AssetPairs, CacheKind::Assets, CacheKind::Rates] {
            self.rebuild(cache).await?;
        }
        tracing::info!(
            asset_pairs = self.caches.asset_pair_count(),
            "Reference caches initialized"
        );
        Ok(())
    }

    /// Rebuild the caches affected by a change notification.
    ///
    /// # Errors
    ///
    /// Returns error if a data set cannot be fetched; the affected cache keeps
    /// its previous generation.
    pub async fn handle_change(&self, kind: ReferenceDataKind) -> Result<(), ReferenceDataError> {
        for cache in kind.affected_caches() {
            self.rebuild(*cache).await?;
        }
        tracing::info!(kind = ?kind, "Reference caches rebuilt after change");
        Ok(())
    }

    async fn rebuild(&self, cache: CacheKind) -> Result<(), ReferenceDataError> {
        match cache {
            CacheKind::AssetPairs => {
                let pairs = self.source.asset_pairs().await?;
                let count = pairs.len();
                let generation = self.caches.replace_asset_pairs(pairs);
                tracing::debug!(count, generation, "Asset pair cache replaced");
            }
            CacheKind::Assets => {
                let assets = self.source.assets().await?;
                let count = assets.len();
                let generation = self.caches.replace_assets(assets);
                tracing::debug!(count, generation, "Asset cache replaced");
            }
            CacheKind::Rates => {
                // Fetch all three before swapping any so the tables stay consistent.
                let swaps = self.source.overnight_swap_rates().await?;
                let orders = self.source.order_execution_rates().await?;
                let on_behalf = self.source.on_behalf_rates().await?;
                self.caches.replace_overnight_swap_rates(swaps);
                self.caches.replace_order_execution_rates(orders);
                self.caches.replace_on_behalf_rates(on_behalf);
                tracing::debug!(
                    generation = self.caches.rate_generation(),
                    "Rate tables replaced"
                );
            }
        }
        Ok(())
    }
}

/// Replaces whole rate tables in storage and in the caches.
pub struct RateSettingsService<S: RateSettingsRepository> {
    store: Arc<S>,
    caches: Arc<ReferenceCaches>,
}

impl<S: RateSettingsRepository> RateSettingsService<S> {
    /// Create a service.
    #[must_use]
    pub const fn new(store: Arc<S>, caches: Arc<ReferenceCaches>) -> Self {
        Self { store, caches }
    }

    /// Current overnight swap rates.
    #[must_use]
    pub fn overnight_swap_rates(&self) -> Vec<OvernightSwapRate> {
        self.caches.overnight_swap_rates().records()
    }

    /// Current order execution rates.
    #[must_use]
    pub fn order_execution_rates(&self) -> Vec<OrderExecutionRate> {
        self.caches.order_execution_rates().records()
    }

    /// Current on-behalf rates.
    #[must_use]
    pub fn on_behalf_rates(&self) -> Vec<OnBehalfRate> {
        self.caches.on_behalf_rates().records()
    }

    /// Persist and publish a new overnight swap rate table.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails; the cache is left untouched.
    pub async fn replace_overnight_swap_rates(
        &self,
        rates: Vec<OvernightSwapRate>,
    ) -> Result<(), ReferenceDataError> {
        self.store.replace_overnight_swap_rates(rates.clone()).await?;
        let count = rates.len();
        self.caches.replace_overnight_swap_rates(rates);
        tracing::info!(count, "Overnight swap rates replaced");
        Ok(())
    }

    /// Persist and publish a new order execution rate table.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails; the cache is left untouched.
    pub async fn replace_order_execution_rates(
        &self,
        rates: Vec<OrderExecutionRate>,
    ) -> Result<(), ReferenceDataError> {
        self.store
            .replace_order_execution_rates(rates.clone())
            .await?;
        let count = rates.len();
        self.caches.replace_order_execution_rates(rates);
        tracing::info!(count, "Order execution rates replaced");
        Ok(())
    }

    /// Persist and publish a new on-behalf rate table.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails; the cache is left untouched.
    pub async fn replace_on_behalf_rates(
        &self,
        rates: Vec<OnBehalfRate>,
    ) -> Result<(), ReferenceDataError> {
        self.store.replace_on_behalf_rates(rates.clone()).await?;
        let count = rates.len();
        self.caches.replace_on_behalf_rates(rates);
        tracing::info!(count, "On-behalf rates replaced");
        Ok(())
    }
}
