//! Rate records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::table::{RateScope, ScopedRate};
use crate::domain::shared::{AssetId, AssetPairId, TradingConditionId};

/// Financing parameters for holding a position overnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvernightSwapRate {
    /// Instrument the rate applies to.
    pub asset_pair_id: AssetPairId,
    /// Trading condition, `None` for the instrument default.
    #[serde(default)]
    pub trading_condition_id: Option<TradingConditionId>,
    /// Fixed annual financing rate charged on both sides.
    pub fix_rate: Decimal,
    /// Additional annual surcharge for short positions.
    pub repo_surcharge_percent: Decimal,
    /// Annual benchmark rate of the base asset.
    pub variable_rate_base: Decimal,
    /// Annual benchmark rate of the quote asset.
    pub variable_rate_quote: Decimal,
}

impl OvernightSwapRate {
    /// Build the global fallback record for an instrument.
    #[must_use]
    pub fn fallback(asset_pair_id: AssetPairId, fix_rate: Decimal, repo_surcharge: Decimal) -> Self {
        Self {
            asset_pair_id,
            trading_condition_id: None,
            fix_rate,
            repo_surcharge_percent: repo_surcharge,
            variable_rate_base: Decimal::ZERO,
            variable_rate_quote: Decimal::ZERO,
        }
    }
}

impl ScopedRate for OvernightSwapRate {
    fn scope(&self) -> RateScope {
        RateScope::new(
            self.trading_condition_id.clone(),
            Some(self.asset_pair_id.clone()),
        )
    }
}

/// Commission charged when an order is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExecutionRate {
    /// Instrument the rate applies to.
    pub asset_pair_id: AssetPairId,
    /// Trading condition, `None` for the instrument default.
    #[serde(default)]
    pub trading_condition_id: Option<TradingConditionId>,
    /// Maximum commission per order, in the commission asset.
    pub commission_cap: Decimal,
    /// Minimum commission per order, in the commission asset.
    pub commission_floor: Decimal,
    /// Fraction of the order notional.
    pub commission_rate: Decimal,
    /// Asset the commission is denominated in.
    pub commission_asset: AssetId,
    /// Legal entity collecting the commission.
    pub legal_entity: String,
}

impl ScopedRate for OrderExecutionRate {
    fn scope(&self) -> RateScope {
        RateScope::new(
            self.trading_condition_id.clone(),
            Some(self.asset_pair_id.clone()),
        )
    }
}

/// Fee charged per action taken on behalf of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnBehalfRate {
    /// Trading condition, `None` for the default record.
    #[serde(default)]
    pub trading_condition_id: Option<TradingConditionId>,
    /// Fee per action, in the commission asset.
    pub commission: Decimal,
    /// Asset the fee is denominated in.
    pub commission_asset: AssetId,
    /// Legal entity collecting the fee.
    pub legal_entity: String,
}

impl ScopedRate for OnBehalfRate {
    fn scope(&self) -> RateScope {
        RateScope::new(self.trading_condition_id.clone(), None)
    }
}
