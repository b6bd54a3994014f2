//! Outbound events.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::calculation::{CalculationItem, ItemDetails, ItemSubject};
use crate::domain::charging::ChargingSummary;
use crate::domain::operations::OperationKind;
use crate::domain::shared::{
    AccountId, AssetPairId, OperationId, OrderId, PositionId, SubOperationId,
};

/// Every item of an operation has been calculated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedEvent {
    /// Operation kind.
    pub kind: OperationKind,
    /// Operation id.
    pub operation_id: OperationId,
    /// Items calculated.
    pub total: usize,
    /// Items that failed calculation.
    pub failed: usize,
    /// Event time.
    pub created_at: DateTime<Utc>,
}

/// Charging of an operation has completed or timed out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargedEvent {
    /// Operation kind.
    pub kind: OperationKind,
    /// Operation id.
    pub operation_id: OperationId,
    /// Items calculated.
    pub total: usize,
    /// Calculation failures plus failed charges.
    pub failed: usize,
    /// Tracked items never confirmed.
    pub unconfirmed: usize,
    /// True when forced by the charging timeout.
    pub timed_out: bool,
    /// Event time.
    pub created_at: DateTime<Utc>,
}

impl From<ChargingSummary> for ChargedEvent {
    fn from(summary: ChargingSummary) -> Self {
        Self {
            kind: summary.kind,
            operation_id: summary.operation_id,
            total: summary.total,
            failed: summary.failed,
            unconfirmed: summary.unconfirmed,
            timed_out: summary.timed_out,
            created_at: Utc::now(),
        }
    }
}

/// An operation could not be calculated at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartFailedEvent {
    /// Operation kind.
    pub kind: OperationKind,
    /// Operation id.
    pub operation_id: OperationId,
    /// Failure description.
    pub fail_reason: String,
    /// Event time.
    pub created_at: DateTime<Utc>,
}

/// Swap calculated for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvernightSwapCalculatedInternal {
    /// Parent operation.
    pub operation_id: OperationId,
    /// Item id, echoed back in the charge confirmation.
    pub sub_operation_id: SubOperationId,
    /// Account charged.
    pub account_id: AccountId,
    /// Position financed.
    pub position_id: PositionId,
    /// Instrument.
    pub asset_pair_id: AssetPairId,
    /// Amount in the account asset; negative is a debit.
    pub swap_amount: Decimal,
    /// Calculation inputs.
    pub details: Option<ItemDetails>,
    /// Trading day.
    pub trading_day: NaiveDate,
}

/// Daily P&L calculated for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPnlCalculatedInternal {
    /// Parent operation.
    pub operation_id: OperationId,
    /// Item id.
    pub sub_operation_id: SubOperationId,
    /// Account charged.
    pub account_id: AccountId,
    /// Position valued.
    pub position_id: PositionId,
    /// Instrument.
    pub asset_pair_id: AssetPairId,
    /// Uncharged P&L in the account asset.
    pub pnl: Decimal,
    /// Position volume.
    pub volume: Decimal,
    /// Quote asset to account asset conversion.
    pub fx_rate: Decimal,
    /// Trading day.
    pub trading_day: NaiveDate,
}

/// Which commission a [`CommissionCalculatedInternal`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    /// Order execution commission.
    OrderExecution,
    /// On-behalf fee.
    OnBehalf,
}

/// Commission calculated for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionCalculatedInternal {
    /// Parent operation.
    pub operation_id: OperationId,
    /// Item id.
    pub sub_operation_id: SubOperationId,
    /// Account charged.
    pub account_id: AccountId,
    /// Order the commission is for.
    pub order_id: OrderId,
    /// Instrument.
    pub asset_pair_id: AssetPairId,
    /// Amount in the account asset.
    pub amount: Decimal,
    /// Commission type.
    pub commission_type: CommissionType,
    /// Booking reason shown to the client.
    pub reason: String,
    /// Trading day.
    pub trading_day: NaiveDate,
}

/// Any event published by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommissionEvent {
    /// Aggregate calculation result.
    Calculated(CalculatedEvent),
    /// Aggregate charging result.
    Charged(ChargedEvent),
    /// Operation could not start.
    StartFailed(StartFailedEvent),
    /// Per-position swap.
    OvernightSwapCalculated(OvernightSwapCalculatedInternal),
    /// Per-position P&L.
    DailyPnlCalculated(DailyPnlCalculatedInternal),
    /// Per-order commission.
    CommissionCalculated(CommissionCalculatedInternal),
}

impl CommissionEvent {
    /// Operation the event belongs to.
    #[must_use]
    pub const fn operation_id(&self) -> &OperationId {
        match self {
            Self::Calculated(e) => &e.operation_id,
            Self::Charged(e) => &e.operation_id,
            Self::StartFailed(e) => &e.operation_id,
            Self::OvernightSwapCalculated(e) => &e.operation_id,
            Self::DailyPnlCalculated(e) => &e.operation_id,
            Self::CommissionCalculated(e) => &e.operation_id,
        }
    }

    /// Event type name, used for logging and metrics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Calculated(_) => "calculated",
            Self::Charged(_) => "charged",
            Self::StartFailed(_) => "start_failed",
            Self::OvernightSwapCalculated(_) => "overnight_swap_calculated",
            Self::DailyPnlCalculated(_) => "daily_pnl_calculated",
            Self::CommissionCalculated(_) => "commission_calculated",
        }
    }

    /// Per-item internal event for a successfully calculated item.
    ///
    /// Returns `None` for failed items, which are never sent for charging.
    #[must_use]
    pub fn for_item(item: &CalculationItem) -> Option<Self> {
        if !item.is_success {
            return None;
        }

        let event = match (&item.kind, &item.subject) {
            (OperationKind::OvernightSwap, ItemSubject::Position(position_id)) => {
                Self::OvernightSwapCalculated(OvernightSwapCalculatedInternal {
                    operation_id: item.operation_id.clone(),
                    sub_operation_id: item.id.clone(),
                    account_id: item.account_id.clone(),
                    position_id: position_id.clone(),
                    asset_pair_id: item.instrument.clone(),
                    swap_amount: item.value,
                    details: item.details.clone(),
                    trading_day: item.trading_day,
                })
            }
            (OperationKind::DailyPnl, ItemSubject::Position(position_id)) => {
                let fx_rate = match &item.details {
                    Some(ItemDetails::DailyPnl { fx_rate, .. }) => *fx_rate,
                    _ => Decimal::ONE,
                };
                Self::DailyPnlCalculated(DailyPnlCalculatedInternal {
                    operation_id: item.operation_id.clone(),
                    sub_operation_id: item.id.clone(),
                    account_id: item.account_id.clone(),
                    position_id: position_id.clone(),
                    asset_pair_id: item.instrument.clone(),
                    pnl: item.value,
                    volume: item.volume,
                    fx_rate,
                    trading_day: item.trading_day,
                })
            }
            (OperationKind::OrderExecution, ItemSubject::Order(order_id)) => {
                Self::CommissionCalculated(commission_event(
                    item,
                    order_id,
                    CommissionType::OrderExecution,
                ))
            }
            (OperationKind::OnBehalf, ItemSubject::Order(order_id)) => Self::CommissionCalculated(
                commission_event(item, order_id, CommissionType::OnBehalf),
            ),
            _ => return None,
        };
        Some(event)
    }
}

fn commission_event(
    item: &CalculationItem,
    order_id: &OrderId,
    commission_type: CommissionType,
) -> CommissionCalculatedInternal {
    let reason = match (&item.details, commission_type) {
        (Some(ItemDetails::OrderExecution { order_code, .. }), _) => {
            format!("Commission for order {order_code}")
        }
        (Some(ItemDetails::OnBehalf { actions, .. }), _) => {
            format!("On-behalf fee for {actions} action(s) on order {order_id}")
        }
        (_, CommissionType::OrderExecution) => format!("Commission for order {order_id}"),
        (_, CommissionType::OnBehalf) => format!("On-behalf fee for order {order_id}"),
    };

    CommissionCalculatedInternal {
        operation_id: item.operation_id.clone(),
        sub_operation_id: item.id.clone(),
        account_id: item.account_id.clone(),
        order_id: order_id.clone(),
        asset_pair_id: item.instrument.clone(),
        amount: item.value,
        commission_type,
        reason,
        trading_day: item.trading_day,
    }
}
