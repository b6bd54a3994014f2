//! Global default rates.
//!
//! Used when neither an exact nor an instrument-level rate record exists.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::shared::AssetId;

/// Global fallback rates for every operation kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultRatesConfig {
    /// Overnight swap fallback.
    #[serde(default)]
    pub overnight_swap: DefaultSwapRate,
    /// Order execution fallback.
    #[serde(default)]
    pub order_execution: DefaultOrderExecutionRate,
    /// On-behalf fallback.
    #[serde(default)]
    pub on_behalf: DefaultOnBehalfRate,
}

/// Fallback overnight financing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultSwapRate {
    /// Annual fixed rate.
    #[serde(default = "default_fix_rate")]
    pub fix_rate: Decimal,
    /// Annual short surcharge.
    #[serde(default = "default_repo_surcharge")]
    pub repo_surcharge_percent: Decimal,
}

impl Default for DefaultSwapRate {
    fn default() -> Self {
        Self {
            fix_rate: default_fix_rate(),
            repo_surcharge_percent: default_repo_surcharge(),
        }
    }
}

/// Fallback order execution commission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultOrderExecutionRate {
    /// Maximum commission per order.
    #[serde(default = "default_commission_cap")]
    pub commission_cap: Decimal,
    /// Minimum commission per order.
    #[serde(default)]
    pub commission_floor: Decimal,
    /// Fraction of notional.
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,
    /// Commission asset.
    #[serde(default = "default_commission_asset")]
    pub commission_asset: AssetId,
    /// Collecting legal entity.
    #[serde(default = "default_legal_entity")]
    pub legal_entity: String,
}

impl Default for DefaultOrderExecutionRate {
    fn default() -> Self {
        Self {
            commission_cap: default_commission_cap(),
            commission_floor: Decimal::ZERO,
            commission_rate: default_commission_rate(),
            commission_asset: default_commission_asset(),
            legal_entity: default_legal_entity(),
        }
    }
}

/// Fallback on-behalf fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultOnBehalfRate {
    /// Fee per action.
    #[serde(default)]
    pub commission: Decimal,
    /// Fee asset.
    #[serde(default = "default_commission_asset")]
    pub commission_asset: AssetId,
    /// Collecting legal entity.
    #[serde(default = "default_legal_entity")]
    pub legal_entity: String,
}

impl Default for DefaultOnBehalfRate {
    fn default() -> Self {
        Self {
            commission: Decimal::ZERO,
            commission_asset: default_commission_asset(),
            legal_entity: default_legal_entity(),
        }
    }
}

fn default_fix_rate() -> Decimal {
    dec!(0.01)
}

fn default_repo_surcharge() -> Decimal {
    dec!(0.005)
}

fn default_commission_cap() -> Decimal {
    dec!(100)
}

fn default_commission_rate() -> Decimal {
    dec!(0.001)
}

fn default_commission_asset() -> AssetId {
    AssetId::new("USD")
}

fn default_legal_entity() -> String {
    "Default".to_string()
}
