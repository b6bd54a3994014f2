//! Calculation items.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trading::Direction;
use crate::domain::operations::OperationKind;
use crate::domain::rates::RateSource;
use crate::domain::shared::{AccountId, AssetId, AssetPairId, OperationId, OrderId, PositionId, SubOperationId};

/// Category of a per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemErrorKind {
    /// Instrument is not in the asset pair cache.
    MissingAssetPair,
    /// Settlement asset is not in the asset cache.
    MissingAsset,
    /// No quote for the instrument.
    MissingQuote,
    /// No quote path between two assets.
    MissingFxRate,
    /// Account could not be found.
    MissingAccount,
    /// Position snapshot violates basic invariants.
    MalformedPosition,
    /// Decimal overflow during the calculation.
    Arithmetic,
}

/// Structured error attached to a failed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct ItemError {
    /// Failure category.
    pub kind: ItemErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl ItemError {
    /// Create an item error.
    #[must_use]
    pub fn new(kind: ItemErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Decimal overflow in the named step.
    #[must_use]
    pub fn overflow(step: &str) -> Self {
        Self::new(ItemErrorKind::Arithmetic, format!("overflow computing {step}"))
    }
}

/// Outcome of charging an item downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    /// No confirmation received yet.
    Unknown,
    /// Downstream reported a failed charge.
    Failed,
    /// Downstream charged the amount.
    Succeeded,
}

/// The position or order an item was computed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ItemSubject {
    /// An open position.
    Position(PositionId),
    /// An executed order.
    Order(OrderId),
}

/// Kind-specific calculation inputs kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDetails {
    /// Overnight swap inputs.
    OvernightSwap {
        /// Price the notional was valued at.
        price: Decimal,
        /// Quote asset to account asset conversion.
        fx_rate: Decimal,
        /// Annualized financing rate applied.
        financing_rate: Decimal,
        /// Days financed.
        financing_days: u32,
        /// Day-count basis.
        financing_days_per_year: u32,
        /// Where the rate came from.
        rate_source: RateSource,
    },
    /// Daily P&L inputs.
    DailyPnl {
        /// Position open price.
        open_price: Decimal,
        /// Bid for longs, ask for shorts.
        close_price: Decimal,
        /// Quote asset to account asset conversion.
        fx_rate: Decimal,
        /// P&L charged before this run.
        charged_pnl: Decimal,
    },
    /// Order execution commission inputs.
    OrderExecution {
        /// Upstream order code.
        order_code: String,
        /// Notional in the commission asset.
        notional: Decimal,
        /// Commission before conversion to the account asset.
        commission: Decimal,
        /// Asset the commission is denominated in.
        commission_asset: AssetId,
        /// Legal entity collecting the commission.
        legal_entity: String,
        /// Where the rate came from.
        rate_source: RateSource,
    },
    /// On-behalf fee inputs.
    OnBehalf {
        /// Number of on-behalf actions on the order.
        actions: u32,
        /// Fee per action in the commission asset.
        commission: Decimal,
        /// Asset the fee is denominated in.
        commission_asset: AssetId,
        /// Legal entity collecting the fee.
        legal_entity: String,
        /// Where the rate came from.
        rate_source: RateSource,
    },
}

/// Result of calculating one position or order within an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationItem {
    /// Sub-operation id, `{operation_id}_{index}`.
    pub id: SubOperationId,
    /// Parent operation.
    pub operation_id: OperationId,
    /// Operation kind.
    pub kind: OperationKind,
    /// Account charged.
    pub account_id: AccountId,
    /// Instrument.
    pub instrument: AssetPairId,
    /// Side, when known.
    pub direction: Option<Direction>,
    /// Calculation time.
    pub time: DateTime<Utc>,
    /// Volume the amount applies to.
    pub volume: Decimal,
    /// Amount in the account asset. Zero for failed items.
    pub value: Decimal,
    /// Position or order the item belongs to.
    pub subject: ItemSubject,
    /// Calculation inputs, absent for failed items.
    pub details: Option<ItemDetails>,
    /// Trading day the amount is booked on.
    pub trading_day: NaiveDate,
    /// Whether the amount was computed.
    pub is_success: bool,
    /// Failure detail for unsuccessful items.
    pub error: Option<ItemError>,
    /// Downstream charge outcome.
    pub charge_status: ChargeStatus,
}

impl CalculationItem {
    /// Record the downstream charge outcome.
    ///
    /// Only the first confirmation moves the status out of `Unknown`;
    /// returns `false` for every later one.
    pub fn mark_charged(&mut self, succeeded: bool) -> bool {
        if self.charge_status != ChargeStatus::Unknown {
            return false;
        }
        self.charge_status = if succeeded {
            ChargeStatus::Succeeded
        } else {
            ChargeStatus::Failed
        };
        true
    }

    /// Error kind, if the item failed.
    #[must_use]
    pub fn error_kind(&self) -> Option<ItemErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item() -> CalculationItem {
        let operation_id = OperationId::new("op-1");
        CalculationItem {
            id: SubOperationId::for_item(&operation_id, 0),
            operation_id,
            kind: OperationKind::DailyPnl,
            account_id: AccountId::new("acc-1"),
            instrument: AssetPairId::new("EURUSD"),
            direction: Some(Direction::Long),
            time: Utc::now(),
            volume: dec!(1000),
            value: dec!(12.5),
            subject: ItemSubject::Position(PositionId::new("p-1")),
            details: None,
            trading_day: NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(),
            is_success: true,
            error: None,
            charge_status: ChargeStatus::Unknown,
        }
    }

    #[test]
    fn charge_status_transitions_once() {
        let mut item = item();
        assert!(item.mark_charged(true));
        assert!(!item.mark_charged(false));
        assert_eq!(item.charge_status, ChargeStatus::Succeeded);
    }

    #[test]
    fn failed_charge_is_terminal() {
        let mut item = item();
        assert!(item.mark_charged(false));
        assert!(!item.mark_charged(true));
        assert_eq!(item.charge_status, ChargeStatus::Failed);
    }

    #[test]
    fn item_error_display_includes_kind() {
        let err = ItemError::new(ItemErrorKind::MissingQuote, "no quote for EURUSD");
        assert_eq!(err.to_string(), "MissingQuote: no quote for EURUSD");
    }

    #[test]
    fn subject_serializes_tagged() {
        let json = serde_json::to_value(ItemSubject::Order(OrderId::new("o-1"))).unwrap();
        assert_eq!(json, serde_json::json!({"type": "order", "id": "o-1"}));
    }
}
