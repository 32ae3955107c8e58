//! Rounding and percentage helpers shared by the calculation steps.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to whole currency units, half away from zero.
///
/// # Examples
///
/// ```
/// use paye_engine::calculation::round_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_amount(Decimal::from_str("4629.6").unwrap()), Decimal::from(4630));
/// assert_eq!(round_amount(Decimal::from_str("12.5").unwrap()), Decimal::from(13));
/// ```
pub fn round_amount(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Rounds a percentage to two decimal places, half away from zero.
pub fn round_percent(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Applies a percentage rate to an amount, without rounding.
pub fn apply_rate(amount: Decimal, rate_percent: Decimal) -> Decimal {
    amount * rate_percent / Decimal::ONE_HUNDRED
}

/// Expresses `part` as a percentage of `whole`, rounded to two decimals.
///
/// Returns zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round_percent(part * Decimal::ONE_HUNDRED / whole)
}

/// Clamps a value at zero.
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_round_amount_below_midpoint() {
        assert_eq!(round_amount(dec("16605.4")), dec("16605"));
    }

    #[test]
    fn test_round_amount_at_midpoint_rounds_up() {
        assert_eq!(round_amount(dec("89179.5")), dec("89180"));
    }

    #[test]
    fn test_round_amount_normalizes_scale() {
        assert_eq!(round_amount(dec("12600.000")).to_string(), "12600");
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(dec("87.655")), dec("87.66"));
        assert_eq!(round_percent(dec("12.344")), dec("12.34"));
    }

    #[test]
    fn test_apply_rate() {
        assert_eq!(apply_rate(dec("350000"), dec("3.6")), dec("12600"));
        assert_eq!(apply_rate(dec("350000"), dec("0")), dec("0"));
    }

    #[test]
    fn test_percent_of_handles_zero_whole() {
        assert_eq!(percent_of(dec("10"), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(percent_of(dec("1"), dec("3")), dec("33.33"));
    }

    #[test]
    fn test_floor_at_zero() {
        assert_eq!(floor_at_zero(dec("-5")), Decimal::ZERO);
        assert_eq!(floor_at_zero(dec("5")), dec("5"));
    }
}
