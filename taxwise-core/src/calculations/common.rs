//! Common utility functions for tax calculations.
//!
//! This module provides shared functionality used across the calculators,
//! including rounding and conversion of raw form values into amounts.

use rust_decimal::Decimal;

use crate::error::TaxEngineError;
use crate::models::Amount;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwise_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Adds two amounts, failing instead of overflowing.
///
/// # Errors
///
/// Returns [`TaxEngineError::InvalidInput`] naming `field` when the sum does
/// not fit in an [`Amount`].
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use taxwise_core::calculations::common::checked_add;
///
/// assert_eq!(checked_add("gross_income", dec!(1.50), dec!(2)).unwrap(), dec!(3.50));
/// assert!(checked_add("gross_income", Decimal::MAX, dec!(1)).is_err());
/// ```
pub fn checked_add(
    field: &str,
    a: Amount,
    b: Amount,
) -> Result<Amount, TaxEngineError> {
    a.checked_add(b)
        .ok_or_else(|| TaxEngineError::invalid_input(field, "amount out of range"))
}

/// Converts a raw floating-point form value into an [`Amount`].
///
/// Presentation layers collect numbers as `f64`; this is the single place
/// where they enter the engine. The value is rounded to the minor unit.
///
/// # Errors
///
/// Returns [`TaxEngineError::InvalidInput`] when `value` is NaN, infinite or
/// negative.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwise_core::calculations::common::amount_from_f64;
///
/// assert_eq!(amount_from_f64("basic_salary", 600000.0).unwrap(), dec!(600000.00));
/// assert!(amount_from_f64("basic_salary", f64::NAN).is_err());
/// assert!(amount_from_f64("basic_salary", -1.0).is_err());
/// ```
pub fn amount_from_f64(
    field: &str,
    value: f64,
) -> Result<Amount, TaxEngineError> {
    if !value.is_finite() {
        return Err(TaxEngineError::invalid_input(
            field,
            format!("amount must be a finite number, got {value}"),
        ));
    }
    if value < 0.0 {
        return Err(TaxEngineError::invalid_input(
            field,
            format!("amount must be non-negative, got {value}"),
        ));
    }
    let amount = Decimal::from_f64_retain(value).ok_or_else(|| {
        TaxEngineError::invalid_input(field, format!("amount {value} is out of range"))
    })?;
    Ok(round_half_up(amount))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        let result = round_half_up(dec!(123.454));

        assert_eq!(result, dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        let result = round_half_up(dec!(123.455));

        assert_eq!(result, dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        let result = round_half_up(dec!(-123.455));

        assert_eq!(result, dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        let result = round_half_up(dec!(999999.999));

        assert_eq!(result, dec!(1000000.00));
    }

    // =========================================================================
    // checked_add tests
    // =========================================================================

    #[test]
    fn checked_add_sums_in_range_amounts() {
        assert_eq!(checked_add("gross_income", dec!(100.25), dec!(200.75)), Ok(dec!(301.00)));
    }

    #[test]
    fn checked_add_reports_overflow_against_field() {
        let result = checked_add("gross_income", Decimal::MAX, dec!(1));

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                field: "gross_income".to_string(),
                reason: "amount out of range".to_string(),
            })
        );
    }

    // =========================================================================
    // amount_from_f64 tests
    // =========================================================================

    #[test]
    fn amount_from_f64_rounds_to_minor_unit() {
        let result = amount_from_f64("rental_income", 1234.567);

        assert_eq!(result, Ok(dec!(1234.57)));
    }

    #[test]
    fn amount_from_f64_accepts_zero() {
        assert_eq!(amount_from_f64("rental_income", 0.0), Ok(dec!(0)));
    }

    #[test]
    fn amount_from_f64_rejects_infinity() {
        let result = amount_from_f64("freelance_income", f64::INFINITY);

        match result {
            Err(TaxEngineError::InvalidInput { field, reason }) => {
                assert_eq!(field, "freelance_income");
                assert!(reason.contains("finite"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn amount_from_f64_rejects_negative() {
        let result = amount_from_f64("80C", -0.5);

        assert!(matches!(result, Err(TaxEngineError::InvalidInput { .. })));
    }
}
