//! Pure calculation formulas.
//!
//! Arithmetic on amounts is checked; an overflow becomes an
//! [`ItemErrorKind::Arithmetic`](super::ItemErrorKind::Arithmetic) item error
//! instead of a panic.

use rust_decimal::Decimal;

use super::item::ItemError;
use super::trading::Direction;
use crate::domain::rates::{OrderExecutionRate, OvernightSwapRate};
use crate::domain::shared::round_to_accuracy;

/// Seconds in one financing day.
pub const SECONDS_PER_DAY: i64 = 86_400;

fn mul(a: Decimal, b: Decimal, step: &str) -> Result<Decimal, ItemError> {
    a.checked_mul(b).ok_or_else(|| ItemError::overflow(step))
}

fn sub(a: Decimal, b: Decimal, step: &str) -> Result<Decimal, ItemError> {
    a.checked_sub(b).ok_or_else(|| ItemError::overflow(step))
}

fn div(a: Decimal, b: Decimal, step: &str) -> Result<Decimal, ItemError> {
    a.checked_div(b).ok_or_else(|| ItemError::overflow(step))
}

/// Annualized financing rate applied to a position.
///
/// Both sides pay the fixed rate, shorts additionally pay the repo
/// surcharge, and the base/quote benchmark differential is credited to
/// longs and debited from shorts.
#[must_use]
pub fn financing_rate(rate: &OvernightSwapRate, direction: Direction) -> Decimal {
    let surcharge = match direction {
        Direction::Long => Decimal::ZERO,
        Direction::Short => rate.repo_surcharge_percent,
    };
    let differential = (rate.variable_rate_base - rate.variable_rate_quote) * direction.sign();
    -rate.fix_rate - surcharge + differential
}

/// Inputs to [`swap_amount`].
#[derive(Debug, Clone, Copy)]
pub struct SwapInputs {
    /// Instrument price.
    pub price: Decimal,
    /// Position volume; the sign is ignored.
    pub volume: Decimal,
    /// Quote asset to account asset conversion.
    pub fx_rate: Decimal,
    /// Annualized financing rate.
    pub financing_rate: Decimal,
    /// Days financed.
    pub financing_days: u32,
    /// Day-count basis.
    pub financing_days_per_year: u32,
    /// Decimal places of the result.
    pub accuracy: u32,
}

/// Overnight swap amount in the account asset:
/// `price × |volume| × fx × rate × elapsed_seconds / seconds_per_year`.
///
/// # Errors
///
/// Returns an arithmetic item error on overflow or a zero day-count basis.
pub fn swap_amount(inputs: SwapInputs) -> Result<Decimal, ItemError> {
    let elapsed = Decimal::from(i64::from(inputs.financing_days) * SECONDS_PER_DAY);
    let per_year = Decimal::from(i64::from(inputs.financing_days_per_year) * SECONDS_PER_DAY);

    let notional = mul(inputs.price, inputs.volume.abs(), "swap notional")?;
    let converted = mul(notional, inputs.fx_rate, "swap fx conversion")?;
    let annual = mul(converted, inputs.financing_rate, "swap annual amount")?;
    let accrued = mul(annual, elapsed, "swap accrual")?;
    let amount = div(accrued, per_year, "swap day-count")?;
    Ok(round_to_accuracy(amount, inputs.accuracy))
}

/// Unrealized P&L not yet charged, in the account asset.
///
/// # Errors
///
/// Returns an arithmetic item error on overflow.
pub fn daily_pnl(
    open_price: Decimal,
    close_price: Decimal,
    volume: Decimal,
    direction: Direction,
    fx_rate: Decimal,
    charged_pnl: Decimal,
    accuracy: u32,
) -> Result<Decimal, ItemError> {
    let move_per_unit = sub(close_price, open_price, "pnl price move")?;
    let raw = mul(move_per_unit, volume.abs(), "pnl")?;
    let signed = mul(raw, direction.sign(), "pnl")?;
    let converted = mul(signed, fx_rate, "pnl fx conversion")?;
    let pnl = sub(converted, charged_pnl, "pnl net of charged")?;
    Ok(round_to_accuracy(pnl, accuracy))
}

/// Order commission in the commission asset, clamped to `[floor, cap]`.
///
/// # Errors
///
/// Returns an arithmetic item error on overflow.
pub fn order_commission(
    rate: &OrderExecutionRate,
    notional: Decimal,
) -> Result<Decimal, ItemError> {
    let raw = mul(rate.commission_rate, notional.abs(), "order commission")?;
    Ok(clamp(raw, rate.commission_floor, rate.commission_cap))
}

/// On-behalf fee in the commission asset.
///
/// # Errors
///
/// Returns an arithmetic item error on overflow.
pub fn on_behalf_fee(actions: u32, commission: Decimal) -> Result<Decimal, ItemError> {
    mul(Decimal::from(actions), commission, "on-behalf fee")
}

/// Clamp that tolerates a misconfigured `floor > cap` by letting the cap win.
fn clamp(value: Decimal, floor: Decimal, cap: Decimal) -> Decimal {
    value.max(floor).min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{AssetId, AssetPairId};
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn swap_rate() -> OvernightSwapRate {
        OvernightSwapRate {
            asset_pair_id: AssetPairId::new("EURUSD"),
            trading_condition_id: None,
            fix_rate: dec!(0.01),
            repo_surcharge_percent: dec!(0.005),
            variable_rate_base: dec!(0.03),
            variable_rate_quote: dec!(0.05),
        }
    }

    fn order_rate() -> OrderExecutionRate {
        OrderExecutionRate {
            asset_pair_id: AssetPairId::new("EURUSD"),
            trading_condition_id: None,
            commission_cap: dec!(50),
            commission_floor: dec!(2),
            commission_rate: dec!(0.001),
            commission_asset: AssetId::new("USD"),
            legal_entity: "LE".to_string(),
        }
    }

    #[test]
    fn financing_rate_long() {
        // -0.01 + (0.03 - 0.05)
        assert_eq!(financing_rate(&swap_rate(), Direction::Long), dec!(-0.03));
    }

    #[test]
    fn financing_rate_short_pays_surcharge() {
        // -0.01 - 0.005 - (0.03 - 0.05)
        assert_eq!(financing_rate(&swap_rate(), Direction::Short), dec!(0.005));
    }

    #[test]
    fn swap_one_day_rounds_to_accuracy() {
        let amount = swap_amount(SwapInputs {
            price: dec!(1),
            volume: dec!(100000),
            fx_rate: dec!(1),
            financing_rate: dec!(0.0001),
            financing_days: 1,
            financing_days_per_year: 365,
            accuracy: 2,
        })
        .unwrap();
        // 100000 * 0.0001 * 86400 / (365 * 86400) = 0.027397...
        assert_eq!(amount, dec!(0.03));
    }

    #[test]
    fn swap_weekend_triples_accrual() {
        let one = SwapInputs {
            price: dec!(2),
            volume: dec!(-36500),
            fx_rate: dec!(1),
            financing_rate: dec!(0.01),
            financing_days: 1,
            financing_days_per_year: 365,
            accuracy: 4,
        };
        let three = SwapInputs {
            financing_days: 3,
            ..one
        };
        assert_eq!(swap_amount(one).unwrap(), dec!(2));
        assert_eq!(swap_amount(three).unwrap(), dec!(6));
    }

    #[test]
    fn swap_zero_day_basis_is_an_item_error() {
        let err = swap_amount(SwapInputs {
            price: dec!(1),
            volume: dec!(1),
            fx_rate: dec!(1),
            financing_rate: dec!(0.01),
            financing_days: 1,
            financing_days_per_year: 0,
            accuracy: 2,
        })
        .unwrap_err();
        assert_eq!(err.kind, crate::domain::calculation::ItemErrorKind::Arithmetic);
    }

    #[test_case(Direction::Long, dec!(1.2), dec!(100) ; "long gains when price rises")]
    #[test_case(Direction::Short, dec!(1.2), dec!(-100) ; "short loses when price rises")]
    #[test_case(Direction::Long, dec!(0.9), dec!(-50) ; "long loses when price falls")]
    fn pnl_by_direction(direction: Direction, close: Decimal, expected: Decimal) {
        let pnl = daily_pnl(dec!(1.0), close, dec!(500), direction, dec!(1), dec!(0), 2).unwrap();
        assert_eq!(pnl, expected);
    }

    #[test]
    fn pnl_subtracts_already_charged() {
        let pnl = daily_pnl(dec!(1.0), dec!(1.2), dec!(500), Direction::Long, dec!(1), dec!(60), 2)
            .unwrap();
        assert_eq!(pnl, dec!(40));
    }

    #[test_case(Decimal::MAX, dec!(-1), dec!(0) ; "price move overflows")]
    #[test_case(dec!(1), dec!(0), Decimal::MIN ; "charged pnl overflows")]
    fn pnl_overflow_is_item_error(close: Decimal, open: Decimal, charged: Decimal) {
        let err = daily_pnl(open, close, dec!(1), Direction::Long, dec!(1), charged, 2).unwrap_err();
        assert_eq!(err.kind, crate::domain::calculation::ItemErrorKind::Arithmetic);
    }

    #[test_case(dec!(1000), dec!(2) ; "floor applies")]
    #[test_case(dec!(10000), dec!(10) ; "rate applies")]
    #[test_case(dec!(100000), dec!(50) ; "cap applies")]
    fn order_commission_is_clamped(notional: Decimal, expected: Decimal) {
        assert_eq!(order_commission(&order_rate(), notional).unwrap(), expected);
    }

    #[test]
    fn on_behalf_fee_scales_with_actions() {
        assert_eq!(on_behalf_fee(3, dec!(4.5)).unwrap(), dec!(13.5));
        assert_eq!(on_behalf_fee(0, dec!(4.5)).unwrap(), Decimal::ZERO);
    }
}
