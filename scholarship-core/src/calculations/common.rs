//! Common utility functions for tax calculations.
//!
//! Scenario arithmetic is carried out at full precision; rounding only happens
//! when figures are prepared for display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole dollars, half away from zero, the way return line items are entered.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use scholarship_core::calculations::common::round_whole_dollars;
///
/// assert_eq!(round_whole_dollars(dec!(1405.38)), dec!(1405));
/// assert_eq!(round_whole_dollars(dec!(709.50)), dec!(710));
/// ```
pub fn round_whole_dollars(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `value`, or zero when `value` is negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use scholarship_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(250.00)), dec!(250.00));
/// assert_eq!(floor_at_zero(dec!(-250.00)), dec!(0));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}
