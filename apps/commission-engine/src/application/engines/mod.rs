//! Calculation Engines
//!
//! One engine per operation kind. Engines turn a start command into
//! calculation items:
//!
//! - inputs are sorted by position/order id before indices are assigned, so
//!   sub-operation ids are stable across redeliveries
//! - a problem with one position becomes a failed item and never aborts the
//!   batch
//! - failing to read the inputs at all is a [`CalculationError`]

mod daily_pnl;
mod on_behalf;
mod order_execution;
mod overnight_swap;

pub use daily_pnl::DailyPnlEngine;
pub use on_behalf::OnBehalfEngine;
pub use order_execution::OrderExecutionEngine;
pub use overnight_swap::OvernightSwapEngine;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::application::ports::TradingDataError;
use crate::domain::calculation::{
    CalculationItem, ChargeStatus, Direction, ItemDetails, ItemError, ItemSubject,
};
use crate::domain::operations::OperationKind;
use crate::domain::shared::{AccountId, AssetPairId, OperationId, SubOperationId};

/// Failure that aborts a whole operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    /// Positions, orders or accounts could not be read.
    #[error("Trading data unavailable: {0}")]
    TradingData(#[from] TradingDataError),

    /// The account of a single-order operation does not exist.
    #[error("Account not found: {account_id}")]
    AccountNotFound {
        /// Account identifier.
        account_id: AccountId,
    },
}

/// Computes the items of one operation kind.
#[async_trait]
pub trait CalculationEngine: Send + Sync {
    /// Command that starts this kind of operation.
    type Command: Send + Sync;

    /// Calculate every item of the operation.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError`] when the inputs cannot be read at all.
    async fn calculate(
        &self,
        command: &Self::Command,
    ) -> Result<Vec<CalculationItem>, CalculationError>;
}

/// Item fields shared by every item of an operation.
pub(crate) struct ItemContext<'a> {
    pub operation_id: &'a OperationId,
    pub kind: OperationKind,
    pub trading_day: NaiveDate,
    pub time: DateTime<Utc>,
}

/// Per-item fields.
pub(crate) struct ItemInput {
    pub account_id: AccountId,
    pub instrument: AssetPairId,
    pub direction: Option<Direction>,
    pub volume: Decimal,
    pub subject: ItemSubject,
}

impl ItemContext<'_> {
    /// Build the item at `index` from a calculation outcome.
    pub fn item(
        &self,
        index: usize,
        input: ItemInput,
        outcome: Result<(Decimal, ItemDetails), ItemError>,
    ) -> CalculationItem {
        let (value, details, error) = match outcome {
            Ok((value, details)) => (value, Some(details), None),
            Err(error) => {
                tracing::warn!(
                    operation_id = %self.operation_id,
                    index,
                    error = %error,
                    "Item calculation failed"
                );
                (Decimal::ZERO, None, Some(error))
            }
        };

        CalculationItem {
            id: SubOperationId::for_item(self.operation_id, index),
            operation_id: self.operation_id.clone(),
            kind: self.kind,
            account_id: input.account_id,
            instrument: input.instrument,
            direction: input.direction,
            time: self.time,
            volume: input.volume,
            value,
            subject: input.subject,
            details,
            trading_day: self.trading_day,
            is_success: error.is_none(),
            error,
            charge_status: ChargeStatus::Unknown,
        }
    }
}
