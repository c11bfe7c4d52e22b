//! Income aggregation.
//!
//! Sums every income category into one gross annual figure. No category
//! receives special tax treatment here; that keeps aggregation independent
//! of the regime being evaluated.

use rust_decimal::Decimal;

use crate::calculations::common::checked_add;
use crate::error::TaxEngineError;
use crate::models::{Amount, IncomeProfile};

const GROSS_INCOME: &str = "gross_income";

/// Sums all categories of `profile` into the gross annual income.
///
/// # Errors
///
/// Returns [`TaxEngineError::InvalidInput`] if any category is negative or
/// the total does not fit in an [`Amount`].
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use taxwise_core::calculations::aggregate_income;
/// use taxwise_core::{IncomeCategory, IncomeProfile};
///
/// let profile = IncomeProfile::new()
///     .with(IncomeCategory::BasicSalary, dec!(800000))
///     .with(IncomeCategory::HraAllowance, dec!(150000));
///
/// assert_eq!(aggregate_income(&profile).unwrap(), dec!(950000));
/// ```
pub fn aggregate_income(profile: &IncomeProfile) -> Result<Amount, TaxEngineError> {
    profile.validate()?;

    profile
        .iter()
        .try_fold(Decimal::ZERO, |total, (_, amount)| {
            checked_add(GROSS_INCOME, total, amount)
        })
}
