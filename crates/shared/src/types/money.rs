//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal`; declaration form fields are whole
//! monetary units stored as `i64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to the nearest whole unit, halves away from zero.
///
/// This is the rounding the VAT-7 form expects: `0.5` becomes `1` and
/// `-0.5` becomes `-1`. Values outside the `i64` range saturate.
#[must_use]
pub fn round_to_units(amount: Decimal) -> i64 {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Formats an amount for machine-readable output.
///
/// Always uses `.` as the decimal separator, never groups digits and drops
/// trailing fractional zeros (`230.50` renders as `230.5`, `230.00` as `230`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(344.49), 344)]
    #[case(dec!(344.50), 345)]
    #[case(dec!(344.51), 345)]
    #[case(dec!(345.5), 346)]
    #[case(dec!(-0.5), -1)]
    #[case(dec!(-1.49), -1)]
    #[case(dec!(0), 0)]
    fn test_round_to_units_half_away_from_zero(#[case] amount: Decimal, #[case] expected: i64) {
        assert_eq!(round_to_units(amount), expected);
    }

    #[test]
    fn test_round_to_units_saturates() {
        assert_eq!(round_to_units(Decimal::MAX), i64::MAX);
        assert_eq!(round_to_units(Decimal::MIN), i64::MIN);
    }

    #[rstest]
    #[case(dec!(230.00), "230")]
    #[case(dec!(230.50), "230.5")]
    #[case(dec!(0.01), "0.01")]
    #[case(dec!(1234567.89), "1234567.89")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }
}
