//! Rate Resolver
//!
//! Resolves the rate for a (trading condition, instrument) pair through the
//! chain exact → instrument default → configured global default. Reads one
//! cache snapshot per call and never fails.

use std::sync::Arc;

use crate::application::caches::ReferenceCaches;
use crate::config::DefaultRatesConfig;
use crate::domain::rates::{
    OnBehalfRate, OrderExecutionRate, OvernightSwapRate, RateSource, ResolvedRate,
};
use crate::domain::shared::{AssetPairId, TradingConditionId};

/// Resolves scoped rates against the reference caches.
#[derive(Debug, Clone)]
pub struct RateResolver {
    caches: Arc<ReferenceCaches>,
    defaults: DefaultRatesConfig,
}

impl RateResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new(caches: Arc<ReferenceCaches>, defaults: DefaultRatesConfig) -> Self {
        Self { caches, defaults }
    }

    /// Overnight swap rate for a position.
    #[must_use]
    pub fn overnight_swap(
        &self,
        trading_condition_id: &TradingConditionId,
        instrument: &AssetPairId,
    ) -> ResolvedRate<OvernightSwapRate> {
        self.caches
            .overnight_swap_rates()
            .resolve(Some(trading_condition_id), Some(instrument))
            .unwrap_or_else(|| {
                let fallback = &self.defaults.overnight_swap;
                global(OvernightSwapRate::fallback(
                    instrument.clone(),
                    fallback.fix_rate,
                    fallback.repo_surcharge_percent,
                ))
            })
    }

    /// Order execution rate for an order.
    #[must_use]
    pub fn order_execution(
        &self,
        trading_condition_id: &TradingConditionId,
        instrument: &AssetPairId,
    ) -> ResolvedRate<OrderExecutionRate> {
        self.caches
            .order_execution_rates()
            .resolve(Some(trading_condition_id), Some(instrument))
            .unwrap_or_else(|| {
                let fallback = &self.defaults.order_execution;
                global(OrderExecutionRate {
                    asset_pair_id: instrument.clone(),
                    trading_condition_id: None,
                    commission_cap: fallback.commission_cap,
                    commission_floor: fallback.commission_floor,
                    commission_rate: fallback.commission_rate,
                    commission_asset: fallback.commission_asset.clone(),
                    legal_entity: fallback.legal_entity.clone(),
                })
            })
    }

    /// On-behalf rate for an account's trading condition.
    #[must_use]
    pub fn on_behalf(&self, trading_condition_id: &TradingConditionId) -> ResolvedRate<OnBehalfRate> {
        self.caches
            .on_behalf_rates()
            .resolve(Some(trading_condition_id), None)
            .unwrap_or_else(|| {
                let fallback = &self.defaults.on_behalf;
                global(OnBehalfRate {
                    trading_condition_id: None,
                    commission: fallback.commission,
                    commission_asset: fallback.commission_asset.clone(),
                    legal_entity: fallback.legal_entity.clone(),
                })
            })
    }
}

const fn global<R>(rate: R) -> ResolvedRate<R> {
    ResolvedRate {
        rate,
        source: RateSource::GlobalDefault,
    }
}
