use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::Amount;

/// One bracket of a progressive slab table.
///
/// Covers the half-open income range `[lower_bound, upper_bound)`; a slab
/// with no upper bound extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower_bound: Amount,
    pub upper_bound: Option<Amount>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub fn new(
        lower_bound: Amount,
        upper_bound: Amount,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(
        lower_bound: Amount,
        rate: Decimal,
    ) -> Self {
        Self {
            lower_bound,
            upper_bound: None,
            rate,
        }
    }

    /// Portion of `taxable_income` that falls inside this slab.
    pub fn portion_of(
        &self,
        taxable_income: Amount,
    ) -> Amount {
        if taxable_income <= self.lower_bound {
            return Decimal::ZERO;
        }
        let ceiling = match self.upper_bound {
            Some(upper) => upper.min(taxable_income),
            None => taxable_income,
        };
        ceiling - self.lower_bound
    }
}

/// Checks that `slabs` is a contiguous, sorted table covering `[0, ∞)` with
/// rates in `[0, 1]` that never decrease.
pub fn validate_slab_table(
    regime_id: &str,
    slabs: &[TaxSlab],
) -> Result<(), TaxEngineError> {
    let invalid = |reason: String| TaxEngineError::invalid_slab_table(regime_id, reason);

    let first = slabs
        .first()
        .ok_or_else(|| invalid("slab table is empty".to_string()))?;
    if first.lower_bound != Decimal::ZERO {
        return Err(invalid(format!(
            "first slab must start at 0, starts at {}",
            first.lower_bound
        )));
    }

    let last_index = slabs.len() - 1;
    for (index, slab) in slabs.iter().enumerate() {
        if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
            return Err(invalid(format!(
                "slab {index} rate must be between 0 and 1, got {}",
                slab.rate
            )));
        }

        match slab.upper_bound {
            Some(upper) if upper <= slab.lower_bound => {
                return Err(invalid(format!(
                    "slab {index} upper bound {upper} must exceed lower bound {}",
                    slab.lower_bound
                )));
            }
            Some(_) if index == last_index => {
                return Err(invalid("last slab must be unbounded".to_string()));
            }
            None if index != last_index => {
                return Err(invalid(format!(
                    "slab {index} is unbounded but is not the last slab"
                )));
            }
            _ => {}
        }

        if let Some(next) = slabs.get(index + 1) {
            // Unbounded non-last slabs were rejected above.
            let upper = slab.upper_bound.unwrap_or(Decimal::MAX);
            if next.lower_bound < upper {
                return Err(invalid(format!(
                    "slab {} starts at {} and overlaps slab {index} ending at {upper}",
                    index + 1,
                    next.lower_bound
                )));
            }
            if next.lower_bound > upper {
                return Err(invalid(format!(
                    "gap between {upper} and {} before slab {}",
                    next.lower_bound,
                    index + 1
                )));
            }
            if next.rate < slab.rate {
                return Err(invalid(format!(
                    "slab {} rate {} is lower than preceding rate {}",
                    index + 1,
                    next.rate,
                    slab.rate
                )));
            }
        }
    }

    Ok(())
}
