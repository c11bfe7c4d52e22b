//! Regime calculator.
//!
//! Computes taxable income, progressive slab tax, cess and total liability
//! for a single regime. The calculator knows nothing about deduction policy:
//! callers pass the already-allowed deduction total, so one slab-walking
//! routine serves every regime.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Taxable income = max(0, gross income − allowed deductions) |
//! | 2    | Base tax = Σ over slabs of (portion of taxable income in slab × rate) |
//! | 3    | Cess = base tax × cess rate |
//! | 4    | Total liability = base tax + cess, rounded half-up to 0.01 |
//!
//! Intermediate values keep full precision; rounding happens once, on the
//! total, so per-slab rounding error never accumulates.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxwise_core::calculations::RegimeCalculator;
//! use taxwise_core::TaxSlab;
//!
//! let slabs = vec![TaxSlab::unbounded(dec!(0), dec!(0.10))];
//! let calculator = RegimeCalculator::new(&slabs, dec!(0.04));
//!
//! let result = calculator
//!     .compute_liability("flat", dec!(950000), dec!(0))
//!     .unwrap();
//!
//! assert_eq!(result.base_tax, dec!(95000));
//! assert_eq!(result.cess, dec!(3800));
//! assert_eq!(result.total_liability, dec!(98800.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{checked_add, round_half_up};
use crate::error::TaxEngineError;
use crate::models::{Amount, TaxSlab, validate_slab_table};

/// Liability computed for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub regime_id: String,

    /// Gross income the calculation started from.
    pub gross_income: Amount,

    /// Deductions subtracted before the slab walk.
    pub deductions_allowed: Amount,

    pub taxable_income: Amount,

    /// Slab tax before cess, unrounded.
    pub base_tax: Amount,

    /// Cess on the base tax, unrounded.
    pub cess: Amount,

    /// Base tax plus cess, rounded half-up to two decimals.
    pub total_liability: Amount,
}

/// Calculator for one regime's slab table.
#[derive(Debug, Clone)]
pub struct RegimeCalculator<'a> {
    slabs: &'a [TaxSlab],
    cess_rate: Decimal,
}

impl<'a> RegimeCalculator<'a> {
    /// Creates a calculator over `slabs`.
    ///
    /// The table is validated on every [`compute_liability`](Self::compute_liability)
    /// call rather than here, so construction never fails.
    pub fn new(
        slabs: &'a [TaxSlab],
        cess_rate: Decimal,
    ) -> Self {
        Self { slabs, cess_rate }
    }

    /// Computes the liability for `gross_income` after `deductions_allowed`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidSlabTable`] if the slab table is
    /// malformed or the cess rate is outside `[0, 1]`, and
    /// [`TaxEngineError::InvalidInput`] if either amount is negative.
    pub fn compute_liability(
        &self,
        regime_id: &str,
        gross_income: Amount,
        deductions_allowed: Amount,
    ) -> Result<RegimeResult, TaxEngineError> {
        validate_slab_table(regime_id, self.slabs)?;
        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(TaxEngineError::invalid_slab_table(
                regime_id,
                format!("cess rate must be between 0 and 1, got {}", self.cess_rate),
            ));
        }
        if gross_income < Decimal::ZERO {
            return Err(TaxEngineError::invalid_input(
                "gross_income",
                format!("amount must be non-negative, got {gross_income}"),
            ));
        }
        if deductions_allowed < Decimal::ZERO {
            return Err(TaxEngineError::invalid_input(
                "deductions_allowed",
                format!("amount must be non-negative, got {deductions_allowed}"),
            ));
        }

        let taxable_income = self.taxable_income(gross_income, deductions_allowed);
        let base_tax = self.base_tax(taxable_income);
        let cess = self.cess(base_tax);
        let total_liability = round_half_up(checked_add("total_liability", base_tax, cess)?);

        debug!(
            regime_id,
            taxable_income = %taxable_income,
            base_tax = %base_tax,
            cess = %cess,
            total_liability = %total_liability,
            "Computed regime liability"
        );

        Ok(RegimeResult {
            regime_id: regime_id.to_string(),
            gross_income,
            deductions_allowed,
            taxable_income,
            base_tax,
            cess,
            total_liability,
        })
    }

    /// Step 1: taxable income, floored at zero.
    fn taxable_income(
        &self,
        gross_income: Amount,
        deductions_allowed: Amount,
    ) -> Amount {
        (gross_income - deductions_allowed).max(Decimal::ZERO)
    }

    /// Step 2: progressive slab tax. Each unit of income is taxed by exactly
    /// one slab.
    fn base_tax(
        &self,
        taxable_income: Amount,
    ) -> Amount {
        self.slabs
            .iter()
            .take_while(|slab| slab.lower_bound < taxable_income)
            .map(|slab| slab.portion_of(taxable_income) * slab.rate)
            .sum()
    }

    /// Step 3: cess applied uniformly to the base tax.
    fn cess(
        &self,
        base_tax: Amount,
    ) -> Amount {
        base_tax * self.cess_rate
    }
}
