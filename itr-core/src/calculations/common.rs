//! Small arithmetic helpers shared by the regime calculators and reports.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// The engine itself never rounds; this is for presenting amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(2600.052)), dec!(2600.05));
/// assert_eq!(round_half_up(dec!(2600.055)), dec!(2600.06));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-25000)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(25000)), dec!(25000));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// `part / whole * 100`, defined as zero when `whole` is zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use itr_core::calculations::common::percentage_of;
///
/// assert_eq!(percentage_of(dec!(117000), dec!(1200000)), dec!(9.75));
/// assert_eq!(percentage_of(dec!(500), dec!(0)), dec!(0));
/// ```
pub fn percentage_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}
