//! Reference Data
//!
//! Instruments and assets, plus the kinds of change notification that force
//! a cache rebuild.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{AssetId, AssetPairId};

/// A tradeable instrument quoted as `base/quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPair {
    /// Instrument identifier.
    pub id: AssetPairId,
    /// Asset bought when going long.
    pub base_asset_id: AssetId,
    /// Asset the price is expressed in.
    pub quote_asset_id: AssetId,
    /// Decimal places used when rounding amounts for this instrument.
    pub accuracy: u32,
    /// Legal entity the instrument is traded under.
    pub legal_entity: String,
}

/// A settlement asset (currency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identifier.
    pub id: AssetId,
    /// Decimal places for amounts in this asset.
    pub accuracy: u32,
}

/// Kind of upstream reference-data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceDataKind {
    /// Instrument definition changed.
    AssetPair,
    /// Underlying of an instrument changed.
    Underlying,
    /// Currency definition changed.
    Currency,
    /// Market definition changed.
    Market,
    /// Client profile (trading condition) changed.
    ClientProfile,
    /// Product definition changed.
    Product,
    /// Rate settings changed.
    RateSettings,
}

/// A cache affected by a reference-data change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Instrument cache.
    AssetPairs,
    /// Asset cache.
    Assets,
    /// The three rate tables.
    Rates,
}

impl ReferenceDataKind {
    /// Caches that must be rebuilt after a change of this kind.
    #[must_use]
    pub const fn affected_caches(self) -> &'static [CacheKind] {
        match self {
            Self::AssetPair | Self::Underlying | Self::Market | Self::Product => {
                &[CacheKind::AssetPairs]
            }
            Self::Currency => &[CacheKind::Assets],
            Self::ClientProfile | Self::RateSettings => &[CacheKind::Rates],
        }
    }
}
