//! Start commands.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::operations::OperationKind;
use crate::domain::shared::{AccountId, AssetId, AssetPairId, OperationId, OrderId};

/// Rejection of a malformed command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandValidationError {
    /// A required field is empty.
    #[error("Field '{field}' must not be empty")]
    EmptyField {
        /// Field name.
        field: &'static str,
    },

    /// A field is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Error message.
        message: String,
    },
}

fn require(field: &'static str, blank: bool) -> Result<(), CommandValidationError> {
    if blank {
        return Err(CommandValidationError::EmptyField { field });
    }
    Ok(())
}

/// Start an overnight swap run over all open positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOvernightSwapsProcess {
    /// Operation id.
    pub operation_id: OperationId,
    /// Command creation time; positions opened at or after it are skipped.
    pub created_at: DateTime<Utc>,
    /// Days financed by this run (3 over a weekend).
    pub number_of_financing_days: u32,
    /// Day-count basis.
    pub financing_days_per_year: u32,
    /// Trading day being financed.
    pub trading_day: NaiveDate,
}

/// Start a daily P&L run over all open positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDailyPnlProcess {
    /// Operation id.
    pub operation_id: OperationId,
    /// Command creation time.
    pub created_at: DateTime<Utc>,
    /// Trading day being booked.
    pub trading_day: NaiveDate,
}

/// Charge commission for one executed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleOrderExecutionInternal {
    /// Operation id.
    pub operation_id: OperationId,
    /// Command creation time.
    pub created_at: DateTime<Utc>,
    /// Account that placed the order.
    pub account_id: AccountId,
    /// Executed order.
    pub order_id: OrderId,
    /// Upstream order code.
    pub order_code: String,
    /// Instrument traded.
    pub instrument: AssetPairId,
    /// Legal entity of the trade.
    pub legal_entity: String,
    /// Signed executed volume; negative for sells.
    pub volume: Decimal,
}

/// Charge on-behalf fees for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleOnBehalfInternal {
    /// Operation id.
    pub operation_id: OperationId,
    /// Command creation time.
    pub created_at: DateTime<Utc>,
    /// Account charged.
    pub account_id: AccountId,
    /// Settlement asset of the account.
    pub account_asset_id: AssetId,
    /// Order the actions were taken on.
    pub order_id: OrderId,
    /// Instrument of the order.
    pub asset_pair_id: AssetPairId,
    /// Trading day being booked.
    pub trading_day: NaiveDate,
}

/// Any start command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Overnight swap run.
    StartOvernightSwapsProcess(StartOvernightSwapsProcess),
    /// Daily P&L run.
    StartDailyPnlProcess(StartDailyPnlProcess),
    /// Order execution commission.
    HandleOrderExecutionInternal(HandleOrderExecutionInternal),
    /// On-behalf fee.
    HandleOnBehalfInternal(HandleOnBehalfInternal),
}

/// Behaviour shared by every start command.
pub trait StartCommand: Send + Sync {
    /// Operation id carried by the command.
    fn operation_id(&self) -> &OperationId;

    /// Kind of operation the command starts.
    fn kind(&self) -> OperationKind;

    /// Check field-level constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    fn validate(&self) -> Result<(), CommandValidationError>;
}

impl StartCommand for StartOvernightSwapsProcess {
    fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    fn kind(&self) -> OperationKind {
        OperationKind::OvernightSwap
    }

    fn validate(&self) -> Result<(), CommandValidationError> {
        require("operation_id", self.operation_id.is_blank())?;
        if self.number_of_financing_days == 0 {
            return Err(CommandValidationError::InvalidValue {
                field: "number_of_financing_days",
                message: "must be at least 1".to_string(),
            });
        }
        if self.financing_days_per_year == 0 {
            return Err(CommandValidationError::InvalidValue {
                field: "financing_days_per_year",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl StartCommand for StartDailyPnlProcess {
    fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    fn kind(&self) -> OperationKind {
        OperationKind::DailyPnl
    }

    fn validate(&self) -> Result<(), CommandValidationError> {
        require("operation_id", self.operation_id.is_blank())
    }
}

impl StartCommand for HandleOrderExecutionInternal {
    fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    fn kind(&self) -> OperationKind {
        OperationKind::OrderExecution
    }

    fn validate(&self) -> Result<(), CommandValidationError> {
        require("operation_id", self.operation_id.is_blank())?;
        require("account_id", self.account_id.is_blank())?;
        require("order_id", self.order_id.is_blank())?;
        require("instrument", self.instrument.is_blank())?;
        if self.volume.is_zero() {
            return Err(CommandValidationError::InvalidValue {
                field: "volume",
                message: "must not be zero".to_string(),
            });
        }
        Ok(())
    }
}

impl StartCommand for HandleOnBehalfInternal {
    fn operation_id(&self) -> &OperationId {
        &self.operation_id
    }

    fn kind(&self) -> OperationKind {
        OperationKind::OnBehalf
    }

    fn validate(&self) -> Result<(), CommandValidationError> {
        require("operation_id", self.operation_id.is_blank())?;
        require("account_id", self.account_id.is_blank())?;
        require("account_asset_id", self.account_asset_id.is_blank())?;
        require("order_id", self.order_id.is_blank())?;
        require("asset_pair_id", self.asset_pair_id.is_blank())
    }
}

impl Command {
    fn inner(&self) -> &dyn StartCommand {
        match self {
            Self::StartOvernightSwapsProcess(c) => c,
            Self::StartDailyPnlProcess(c) => c,
            Self::HandleOrderExecutionInternal(c) => c,
            Self::HandleOnBehalfInternal(c) => c,
        }
    }

    /// Operation id carried by the command.
    #[must_use]
    pub fn operation_id(&self) -> &OperationId {
        self.inner().operation_id()
    }

    /// Kind of operation the command starts.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.inner().kind()
    }

    /// Check field-level constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), CommandValidationError> {
        self.inner().validate()
    }
}

impl From<StartOvernightSwapsProcess> for Command {
    fn from(value: StartOvernightSwapsProcess) -> Self {
        Self::StartOvernightSwapsProcess(value)
    }
}

impl From<StartDailyPnlProcess> for Command {
    fn from(value: StartDailyPnlProcess) -> Self {
        Self::StartDailyPnlProcess(value)
    }
}

impl From<HandleOrderExecutionInternal> for Command {
    fn from(value: HandleOrderExecutionInternal) -> Self {
        Self::HandleOrderExecutionInternal(value)
    }
}

impl From<HandleOnBehalfInternal> for Command {
    fn from(value: HandleOnBehalfInternal) -> Self {
        Self::HandleOnBehalfInternal(value)
    }
}
