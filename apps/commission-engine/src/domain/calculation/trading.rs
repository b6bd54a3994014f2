//! Read-only snapshots supplied by the trading platform.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::{ItemError, ItemErrorKind};
use crate::domain::shared::{AccountId, AssetId, AssetPairId, PositionId, TradingConditionId};

/// Side of a position or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Bought base asset.
    Long,
    /// Sold base asset.
    Short,
}

impl Direction {
    /// `+1` for long, `-1` for short.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Long => Decimal::ONE,
            Self::Short => Decimal::NEGATIVE_ONE,
        }
    }

    /// Direction implied by a signed volume. Zero is treated as long.
    #[must_use]
    pub fn from_signed_volume(volume: Decimal) -> Self {
        if volume.is_sign_negative() && !volume.is_zero() {
            Self::Short
        } else {
            Self::Long
        }
    }
}

/// An open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    /// Position identifier.
    pub id: PositionId,
    /// Owning account.
    pub account_id: AccountId,
    /// Settlement asset of the account.
    pub account_asset_id: AssetId,
    /// Instrument held.
    pub asset_pair_id: AssetPairId,
    /// Trading condition of the account.
    pub trading_condition_id: TradingConditionId,
    /// Side.
    pub direction: Direction,
    /// Absolute volume, strictly positive.
    pub volume: Decimal,
    /// Average open price, strictly positive.
    pub open_price: Decimal,
    /// Unrealized P&L already charged in earlier runs, in account asset.
    pub charged_pnl: Decimal,
    /// When the position was opened.
    pub opened_at: DateTime<Utc>,
}

impl PositionSnapshot {
    /// Reject snapshots that no formula can be applied to.
    ///
    /// # Errors
    ///
    /// Returns a [`ItemErrorKind::MalformedPosition`] item error.
    pub fn validate(&self) -> Result<(), ItemError> {
        if self.volume <= Decimal::ZERO {
            return Err(ItemError::new(
                ItemErrorKind::MalformedPosition,
                format!("position {} has non-positive volume {}", self.id, self.volume),
            ));
        }
        if self.open_price <= Decimal::ZERO {
            return Err(ItemError::new(
                ItemErrorKind::MalformedPosition,
                format!(
                    "position {} has non-positive open price {}",
                    self.id, self.open_price
                ),
            ));
        }
        Ok(())
    }
}

/// A trading account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account identifier.
    pub id: AccountId,
    /// Trading condition the account belongs to.
    pub trading_condition_id: TradingConditionId,
    /// Settlement asset.
    pub base_asset_id: AssetId,
    /// Legal entity of the account.
    pub legal_entity: String,
}

/// Top-of-book quote for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument.
    pub instrument: AssetPairId,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
    /// Quote time.
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// Create a quote stamped now.
    #[must_use]
    pub fn new(instrument: AssetPairId, bid: Decimal, ask: Decimal) -> Self {
        Self {
            instrument,
            bid,
            ask,
            timestamp: Utc::now(),
        }
    }

    /// Midpoint of bid and ask.
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Price at which a position of the given direction would close.
    #[must_use]
    pub const fn close_price(&self, direction: Direction) -> Decimal {
        match direction {
            Direction::Long => self.bid,
            Direction::Short => self.ask,
        }
    }
}
