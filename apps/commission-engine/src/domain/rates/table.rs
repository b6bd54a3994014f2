//! Scoped rate lookup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::shared::{AssetPairId, TradingConditionId};

/// Key under which a rate record is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateScope {
    /// Trading condition component, `None` for defaults.
    pub trading_condition_id: Option<TradingConditionId>,
    /// Instrument component, `None` for instrument-independent rates.
    pub instrument: Option<AssetPairId>,
}

impl RateScope {
    /// Create a scope key. A blank trading condition is the default scope.
    #[must_use]
    pub fn new(
        trading_condition_id: Option<TradingConditionId>,
        instrument: Option<AssetPairId>,
    ) -> Self {
        Self {
            trading_condition_id: trading_condition_id.filter(|c| !c.is_blank()),
            instrument,
        }
    }
}

/// A rate record that knows its own scope.
pub trait ScopedRate: Clone + Send + Sync {
    /// The scope key this record answers for.
    fn scope(&self) -> RateScope;
}

/// Which step of the lookup chain produced a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Matched on trading condition and instrument.
    Exact,
    /// Matched the instrument record without a trading condition.
    InstrumentDefault,
    /// Came from the configured global default.
    GlobalDefault,
}

/// A rate together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRate<R> {
    /// The rate parameters.
    pub rate: R,
    /// Lookup step that produced it.
    pub source: RateSource,
}

/// Immutable set of rate records indexed by scope.
///
/// Built once from a full record list and never mutated afterwards; a new
/// table replaces the old one wholesale.
#[derive(Debug, Clone)]
pub struct RateTable<R> {
    by_scope: HashMap<RateScope, R>,
}

impl<R> Default for RateTable<R> {
    fn default() -> Self {
        Self {
            by_scope: HashMap::new(),
        }
    }
}

impl<R: ScopedRate> RateTable<R> {
    /// Index a full list of records. Later records win on duplicate scopes.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let by_scope = records
            .into_iter()
            .map(|record| (record.scope(), record))
            .collect();
        Self { by_scope }
    }

    /// Look up a rate: exact match first, then the record for the same
    /// instrument without a trading condition.
    #[must_use]
    pub fn resolve(
        &self,
        trading_condition_id: Option<&TradingConditionId>,
        instrument: Option<&AssetPairId>,
    ) -> Option<ResolvedRate<R>> {
        let instrument = instrument.cloned();

        if let Some(condition) = trading_condition_id.filter(|c| !c.is_blank()) {
            let exact = RateScope::new(Some(condition.clone()), instrument.clone());
            if let Some(rate) = self.by_scope.get(&exact) {
                return Some(ResolvedRate {
                    rate: rate.clone(),
                    source: RateSource::Exact,
                });
            }
        }

        self.by_scope
            .get(&RateScope::new(None, instrument))
            .map(|rate| ResolvedRate {
                rate: rate.clone(),
                source: RateSource::InstrumentDefault,
            })
    }

    /// All records, in unspecified order.
    #[must_use]
    pub fn records(&self) -> Vec<R> {
        self.by_scope.values().cloned().collect()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_scope.len()
    }

    /// True when the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_scope.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rates::OvernightSwapRate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn swap(condition: Option<&str>, fix: Decimal) -> OvernightSwapRate {
        OvernightSwapRate {
            asset_pair_id: AssetPairId::new("EURUSD"),
            trading_condition_id: condition.map(TradingConditionId::new),
            fix_rate: fix,
            repo_surcharge_percent: Decimal::ZERO,
            variable_rate_base: Decimal::ZERO,
            variable_rate_quote: Decimal::ZERO,
        }
    }

    #[test]
    fn exact_match_wins() {
        let table = RateTable::from_records([swap(Some("tc-1"), dec!(0.1)), swap(None, dec!(0.2))]);
        let resolved = table
            .resolve(
                Some(&TradingConditionId::new("tc-1")),
                Some(&AssetPairId::new("EURUSD")),
            )
            .unwrap();
        assert_eq!(resolved.source, RateSource::Exact);
        assert_eq!(resolved.rate.fix_rate, dec!(0.1));
    }

    #[test]
    fn falls_back_to_instrument_default() {
        let table = RateTable::from_records([swap(Some("tc-1"), dec!(0.1)), swap(None, dec!(0.2))]);
        let resolved = table
            .resolve(
                Some(&TradingConditionId::new("tc-9")),
                Some(&AssetPairId::new("EURUSD")),
            )
            .unwrap();
        assert_eq!(resolved.source, RateSource::InstrumentDefault);
        assert_eq!(resolved.rate.fix_rate, dec!(0.2));
    }

    #[test]
    fn unknown_instrument_resolves_to_none() {
        let table = RateTable::from_records([swap(None, dec!(0.2))]);
        let resolved = table.resolve(None, Some(&AssetPairId::new("GBPUSD")));
        assert!(resolved.is_none());
    }

    #[test]
    fn blank_condition_is_instrument_default() {
        let table = RateTable::from_records([swap(Some(""), dec!(0.02))]);
        let resolved = table
            .resolve(
                Some(&TradingConditionId::new("tc-1")),
                Some(&AssetPairId::new("EURUSD")),
            )
            .unwrap();
        assert_eq!(resolved.source, RateSource::InstrumentDefault);
        assert_eq!(resolved.rate.fix_rate, dec!(0.02));
    }

    #[test]
    fn blank_lookup_condition_is_not_exact() {
        let table = RateTable::from_records([swap(None, dec!(0.02))]);
        let resolved = table
            .resolve(
                Some(&TradingConditionId::new(" ")),
                Some(&AssetPairId::new("EURUSD")),
            )
            .unwrap();
        assert_eq!(resolved.source, RateSource::InstrumentDefault);
    }

    #[test]
    fn later_records_replace_earlier_ones() {
        let table = RateTable::from_records([swap(None, dec!(0.2)), swap(None, dec!(0.3))]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].fix_rate, dec!(0.3));
    }
}
