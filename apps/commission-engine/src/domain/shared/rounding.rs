//! Monetary rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a monetary amount to the number of decimal places of an asset.
///
/// Midpoints round away from zero, so `0.125` at two places becomes `0.13`
/// and `-0.125` becomes `-0.13`.
#[must_use]
pub fn round_to_accuracy(value: Decimal, accuracy: u32) -> Decimal {
    value.round_dp_with_strategy(accuracy, RoundingStrategy::MidpointAwayFromZero)
}
