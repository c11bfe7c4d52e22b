//! Deduction ledger.
//!
//! Clamps each claimed section to its statutory cap. Amounts above a cap are
//! reported as overflow so the caller can warn the user; exceeding a cap is
//! never an error.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::checked_add;
use crate::error::TaxEngineError;
use crate::models::{Amount, DeductionClaim};

const TOTAL_DEDUCTIONS: &str = "total_deductions";

/// Claims after caps have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedClaims {
    /// Effective amount per section, never above the section cap.
    pub effective_claims: DeductionClaim,

    /// Sum of all effective amounts.
    pub total_effective: Amount,

    /// Amount above the cap, only for sections that exceeded it.
    pub overflow: BTreeMap<String, Amount>,
}

impl CappedClaims {
    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }
}

/// Applies `caps` to `claims`.
///
/// Sections present in `caps` are clamped to `min(claimed, cap)`; all other
/// sections pass through unchanged.
///
/// # Errors
///
/// Returns [`TaxEngineError::InvalidInput`] if any claim is negative or the
/// effective total does not fit in an [`Amount`].
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use rust_decimal_macros::dec;
/// use taxwise_core::calculations::apply_caps;
/// use taxwise_core::DeductionClaim;
///
/// let claims = DeductionClaim::new().with("80C", dec!(200000));
/// let caps = BTreeMap::from([("80C".to_string(), dec!(150000))]);
///
/// let capped = apply_caps(&claims, &caps).unwrap();
///
/// assert_eq!(capped.effective_claims.get("80C"), dec!(150000));
/// assert_eq!(capped.overflow["80C"], dec!(50000));
/// ```
pub fn apply_caps(
    claims: &DeductionClaim,
    caps: &BTreeMap<String, Amount>,
) -> Result<CappedClaims, TaxEngineError> {
    claims.validate()?;

    let mut result = CappedClaims::default();

    for (section, claimed) in claims.iter() {
        let effective = match caps.get(section) {
            Some(&cap) if claimed > cap => {
                let excess = claimed - cap;
                warn!(
                    section,
                    claimed = %claimed,
                    cap = %cap,
                    excess = %excess,
                    "Deduction claim exceeds statutory cap; clamping"
                );
                result.overflow.insert(section.to_string(), excess);
                cap
            }
            _ => claimed,
        };

        result.effective_claims.set(section, effective);
        result.total_effective = checked_add(TOTAL_DEDUCTIONS, result.total_effective, effective)?;
    }

    Ok(result)
}
