//! The engine's reference data caches.

use std::sync::Arc;

use super::snapshot::{KeyedCache, SnapshotCache};
use crate::domain::rates::{OnBehalfRate, OrderExecutionRate, OvernightSwapRate, RateTable};
use crate::domain::reference::{Asset, AssetPair};
use crate::domain::shared::{AssetId, AssetPairId};

/// Asset pairs, assets and the three rate tables.
#[derive(Debug, Default)]
pub struct ReferenceCaches {
    asset_pairs: KeyedCache<AssetPairId, AssetPair>,
    assets: KeyedCache<AssetId, Asset>,
    overnight_swap_rates: SnapshotCache<RateTable<OvernightSwapRate>>,
    order_execution_rates: SnapshotCache<RateTable<OrderExecutionRate>>,
    on_behalf_rates: SnapshotCache<RateTable<OnBehalfRate>>,
}

impl ReferenceCaches {
    /// Create empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instrument by id.
    #[must_use]
    pub fn asset_pair(&self, id: &AssetPairId) -> Option<AssetPair> {
        self.asset_pairs.get(id)
    }

    /// The instrument quoting `base/quote`, if one exists.
    #[must_use]
    pub fn asset_pair_for(&self, base: &AssetId, quote: &AssetId) -> Option<AssetPair> {
        self.asset_pairs
            .get_all()
            .values()
            .find(|pair| &pair.base_asset_id == base && &pair.quote_asset_id == quote)
            .cloned()
    }

    /// Asset by id.
    #[must_use]
    pub fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.assets.get(id)
    }

    /// Current overnight swap rate table.
    #[must_use]
    pub fn overnight_swap_rates(&self) -> Arc<RateTable<OvernightSwapRate>> {
        self.overnight_swap_rates.load()
    }

    /// Current order execution rate table.
    #[must_use]
    pub fn order_execution_rates(&self) -> Arc<RateTable<OrderExecutionRate>> {
        self.order_execution_rates.load()
    }

    /// Current on-behalf rate table.
    #[must_use]
    pub fn on_behalf_rates(&self) -> Arc<RateTable<OnBehalfRate>> {
        self.on_behalf_rates.load()
    }

    /// Replace every asset pair.
    pub fn replace_asset_pairs(&self, pairs: Vec<AssetPair>) -> u64 {
        self.asset_pairs
            .replace(pairs.into_iter().map(|pair| (pair.id.clone(), pair)))
    }

    /// Replace every asset.
    pub fn replace_assets(&self, assets: Vec<Asset>) -> u64 {
        self.assets
            .replace(assets.into_iter().map(|asset| (asset.id.clone(), asset)))
    }

    /// Replace the overnight swap rate table.
    pub fn replace_overnight_swap_rates(&self, rates: Vec<OvernightSwapRate>) -> u64 {
        self.overnight_swap_rates
            .replace(RateTable::from_records(rates))
    }

    /// Replace the order execution rate table.
    pub fn replace_order_execution_rates(&self, rates: Vec<OrderExecutionRate>) -> u64 {
        self.order_execution_rates
            .replace(RateTable::from_records(rates))
    }

    /// Replace the on-behalf rate table.
    pub fn replace_on_behalf_rates(&self, rates: Vec<OnBehalfRate>) -> u64 {
        self.on_behalf_rates.replace(RateTable::from_records(rates))
    }

    /// Number of cached asset pairs.
    #[must_use]
    pub fn asset_pair_count(&self) -> usize {
        self.asset_pairs.len()
    }

    /// Generation of the asset pair cache.
    #[must_use]
    pub fn asset_pair_generation(&self) -> u64 {
        self.asset_pairs.generation()
    }

    /// Generation of the overnight swap rate table.
    #[must_use]
    pub fn rate_generation(&self) -> u64 {
        self.overnight_swap_rates.generation()
    }
}
