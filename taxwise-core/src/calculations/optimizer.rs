//! Regime optimizer.
//!
//! Evaluates the same income and claims under every configured regime and
//! recommends the one with the lowest total liability.
//!
//! For each regime, in declaration order:
//!
//! 1. Drop claims for sections the regime does not honour.
//! 2. Clamp the remaining claims against the regime's cap table.
//! 3. Add the regime's standard deduction.
//! 4. Run the [`RegimeCalculator`] over the regime's slab table.
//!
//! Ties on liability go to the regime declared first. Any failure aborts
//! the whole optimization; partial results are never returned.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxwise_core::calculations::RegimeOptimizer;
//! use taxwise_core::{DeductionClaim, IncomeCategory, IncomeProfile, presets};
//!
//! let regimes = presets::india_fy2024_25();
//! let income = IncomeProfile::new().with(IncomeCategory::BasicSalary, dec!(1200000));
//! let claims = DeductionClaim::new().with("80C", dec!(150000));
//!
//! let result = RegimeOptimizer::new(&regimes).optimize(&income, &claims).unwrap();
//!
//! assert_eq!(result.recommended_regime_id, "new");
//! assert_eq!(result.evaluations.len(), 2);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::common::checked_add;
use crate::calculations::deductions::{CappedClaims, apply_caps};
use crate::calculations::income::aggregate_income;
use crate::calculations::regime::{RegimeCalculator, RegimeResult};
use crate::error::TaxEngineError;
use crate::models::{Amount, DeductionClaim, IncomeProfile, RegimeConfig};

/// Outcome of one regime inside an optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeEvaluation {
    pub result: RegimeResult,

    /// Ledger of the claims this regime honoured, after caps.
    pub deductions: CappedClaims,

    /// Sections that were claimed but are not eligible under this regime.
    pub ineligible_sections: Vec<String>,
}

/// Result of comparing every configured regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// One evaluation per regime, in declaration order.
    pub evaluations: Vec<RegimeEvaluation>,

    /// Regime with the lowest total liability.
    pub recommended_regime_id: String,

    /// Worst liability minus best liability; never negative.
    pub savings_delta: Amount,
}

impl OptimizationResult {
    /// The evaluation of the recommended regime.
    pub fn recommended(&self) -> Option<&RegimeEvaluation> {
        self.evaluation(&self.recommended_regime_id)
    }

    pub fn evaluation(
        &self,
        regime_id: &str,
    ) -> Option<&RegimeEvaluation> {
        self.evaluations
            .iter()
            .find(|e| e.result.regime_id == regime_id)
    }
}

/// Compares a fixed, ordered set of regimes.
#[derive(Debug, Clone)]
pub struct RegimeOptimizer<'a> {
    regimes: &'a [RegimeConfig],
}

impl<'a> RegimeOptimizer<'a> {
    /// Creates an optimizer over `regimes`. Declaration order decides ties.
    pub fn new(regimes: &'a [RegimeConfig]) -> Self {
        Self { regimes }
    }

    /// Evaluates every regime and recommends the cheapest.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError`] if:
    /// - No regimes were configured
    /// - Any income category or claim is negative
    /// - Any regime configuration is invalid
    pub fn optimize(
        &self,
        income: &IncomeProfile,
        claims: &DeductionClaim,
    ) -> Result<OptimizationResult, TaxEngineError> {
        if self.regimes.is_empty() {
            return Err(TaxEngineError::NoRegimes);
        }

        // Reject bad input before any regime is evaluated.
        let gross_income = aggregate_income(income)?;
        claims.validate()?;

        let evaluations = self
            .regimes
            .iter()
            .map(|regime| self.evaluate(regime, gross_income, claims))
            .collect::<Result<Vec<_>, _>>()?;

        let (best, worst) = self.best_and_worst(&evaluations);
        let recommended_regime_id = best.result.regime_id.clone();
        let savings_delta = worst.result.total_liability - best.result.total_liability;

        info!(
            recommended = %recommended_regime_id,
            liability = %best.result.total_liability,
            savings = %savings_delta,
            "Recommended tax regime"
        );

        Ok(OptimizationResult {
            evaluations,
            recommended_regime_id,
            savings_delta,
        })
    }

    /// Runs one regime: eligibility filter, caps, standard deduction, slab walk.
    fn evaluate(
        &self,
        regime: &RegimeConfig,
        gross_income: Amount,
        claims: &DeductionClaim,
    ) -> Result<RegimeEvaluation, TaxEngineError> {
        regime.validate()?;

        let (eligible, ineligible_sections) = self.partition_claims(regime, claims);
        if !ineligible_sections.is_empty() {
            warn!(
                regime_id = %regime.regime_id,
                sections = ?ineligible_sections,
                "Claims not eligible under regime; ignoring"
            );
        }

        let deductions = apply_caps(&eligible, &regime.deduction_caps)?;
        let deductions_allowed = checked_add(
            "deductions_allowed",
            regime.standard_deduction,
            deductions.total_effective,
        )?;

        debug!(
            regime_id = %regime.regime_id,
            gross_income = %gross_income,
            deductions_allowed = %deductions_allowed,
            "Evaluating regime"
        );

        let result = RegimeCalculator::new(&regime.slabs, regime.cess_rate).compute_liability(
            &regime.regime_id,
            gross_income,
            deductions_allowed,
        )?;

        Ok(RegimeEvaluation {
            result,
            deductions,
            ineligible_sections,
        })
    }

    /// Splits `claims` into those `regime` honours and the names of those it does not.
    fn partition_claims(
        &self,
        regime: &RegimeConfig,
        claims: &DeductionClaim,
    ) -> (DeductionClaim, Vec<String>) {
        let mut eligible = DeductionClaim::new();
        let mut ineligible = Vec::new();

        for (section, amount) in claims.iter() {
            if regime.eligibility.allows(section) {
                eligible.set(section, amount);
            } else if !amount.is_zero() {
                ineligible.push(section.to_string());
            }
        }

        (eligible, ineligible)
    }

    /// Lowest and highest liability; the earliest regime wins a tie for lowest.
    fn best_and_worst<'e>(
        &self,
        evaluations: &'e [RegimeEvaluation],
    ) -> (&'e RegimeEvaluation, &'e RegimeEvaluation) {
        let mut best = &evaluations[0];
        let mut worst = &evaluations[0];

        for evaluation in &evaluations[1..] {
            if evaluation.result.total_liability < best.result.total_liability {
                best = evaluation;
            }
            if evaluation.result.total_liability > worst.result.total_liability {
                worst = evaluation;
            }
        }

        (best, worst)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{DeductionEligibility, IncomeCategory, TaxSlab, sections};

    fn flat_regime(
        id: &str,
        rate: Amount,
    ) -> RegimeConfig {
        RegimeConfig::new(id, vec![TaxSlab::unbounded(dec!(0), rate)])
    }

    fn salary(amount: Amount) -> IncomeProfile {
        IncomeProfile::new().with(IncomeCategory::BasicSalary, amount)
    }

    fn old_regime() -> RegimeConfig {
        RegimeConfig::new(
            "old",
            vec![
                TaxSlab::new(dec!(0), dec!(250000), dec!(0)),
                TaxSlab::new(dec!(250000), dec!(500000), dec!(0.05)),
                TaxSlab::new(dec!(500000), dec!(1000000), dec!(0.20)),
                TaxSlab::unbounded(dec!(1000000), dec!(0.30)),
            ],
        )
        .with_eligibility(DeductionEligibility::sections([
            sections::SEC_80C,
            sections::SEC_80D,
        ]))
        .with_cap(sections::SEC_80C, dec!(150000))
        .with_cap(sections::SEC_80D, dec!(25000))
        .with_standard_deduction(dec!(50000))
        .with_cess_rate(dec!(0.04))
    }

    #[test]
    fn recommends_lower_liability_and_reports_savings() {
        // X: 12.5% of 1,000,000 = 125,000; Y: 11% = 110,000
        let regimes = vec![flat_regime("X", dec!(0.125)), flat_regime("Y", dec!(0.11))];

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(1000000)), &DeductionClaim::new())
            .unwrap();

        assert_eq!(result.evaluation("X").unwrap().result.total_liability, dec!(125000));
        assert_eq!(result.evaluation("Y").unwrap().result.total_liability, dec!(110000));
        assert_eq!(result.recommended_regime_id, "Y");
        assert_eq!(result.savings_delta, dec!(15000));
    }

    #[test]
    fn tie_goes_to_first_declared_regime() {
        let regimes = vec![flat_regime("first", dec!(0.10)), flat_regime("second", dec!(0.10))];

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(500000)), &DeductionClaim::new())
            .unwrap();

        assert_eq!(result.recommended_regime_id, "first");
        assert_eq!(result.savings_delta, dec!(0));
    }

    #[test]
    fn recommended_regime_has_minimum_liability() {
        let regimes = vec![
            flat_regime("a", dec!(0.30)),
            flat_regime("b", dec!(0.05)),
            flat_regime("c", dec!(0.20)),
            flat_regime("d", dec!(0.05)),
        ];

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(800000)), &DeductionClaim::new())
            .unwrap();

        let min = result
            .evaluations
            .iter()
            .map(|e| e.result.total_liability)
            .min()
            .unwrap();
        assert_eq!(result.recommended().unwrap().result.total_liability, min);
        assert_eq!(result.recommended_regime_id, "b");
        // 0.30 * 800000 - 0.05 * 800000
        assert_eq!(result.savings_delta, dec!(200000));
    }

    #[test]
    fn evaluations_follow_declaration_order() {
        let regimes = vec![flat_regime("z", dec!(0.1)), flat_regime("a", dec!(0.2))];

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(100)), &DeductionClaim::new())
            .unwrap();

        let ids: Vec<_> = result
            .evaluations
            .iter()
            .map(|e| e.result.regime_id.as_str())
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn eligibility_and_caps_are_applied_per_regime() {
        let regimes = vec![old_regime(), flat_regime("none", dec!(0.10))];
        let claims = DeductionClaim::new()
            .with(sections::SEC_80C, dec!(200000))
            .with(sections::SEC_80G, dec!(10000));

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(950000)), &claims)
            .unwrap();

        let old = result.evaluation("old").unwrap();
        // 50000 standard + 150000 capped 80C; 80G not eligible
        assert_eq!(old.result.deductions_allowed, dec!(200000));
        assert_eq!(old.deductions.overflow.get(sections::SEC_80C), Some(&dec!(50000)));
        assert_eq!(old.ineligible_sections, vec![sections::SEC_80G.to_string()]);
        // taxable 750000 -> 62500 base + 2500 cess
        assert_eq!(old.result.total_liability, dec!(65000));

        let none = result.evaluation("none").unwrap();
        assert_eq!(none.result.deductions_allowed, dec!(0));
        assert_eq!(none.ineligible_sections.len(), 2);
        assert_eq!(none.result.total_liability, dec!(95000));

        assert_eq!(result.recommended_regime_id, "old");
        assert_eq!(result.savings_delta, dec!(30000));
    }

    #[test]
    fn zero_claims_are_not_reported_as_ineligible() {
        let regimes = vec![flat_regime("none", dec!(0.10))];
        let claims = DeductionClaim::new().with(sections::SEC_80C, dec!(0));

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&salary(dec!(1000)), &claims)
            .unwrap();

        assert!(result.evaluations[0].ineligible_sections.is_empty());
    }

    #[test]
    fn no_regimes_is_an_error() {
        let result = RegimeOptimizer::new(&[]).optimize(&salary(dec!(1)), &DeductionClaim::new());

        assert_eq!(result, Err(TaxEngineError::NoRegimes));
    }

    #[test]
    fn negative_claim_fails_even_when_no_regime_honours_it() {
        let regimes = vec![flat_regime("none", dec!(0.10))];
        let claims = DeductionClaim::new().with(sections::SEC_80G, dec!(-5));

        let result = RegimeOptimizer::new(&regimes).optimize(&salary(dec!(1000)), &claims);

        assert!(matches!(result, Err(TaxEngineError::InvalidInput { .. })));
    }

    #[test]
    fn negative_income_fails_before_evaluation() {
        let regimes = vec![flat_regime("ok", dec!(0.10))];
        let income = salary(dec!(1000)).with(IncomeCategory::RentalIncome, dec!(-1));

        let result = RegimeOptimizer::new(&regimes).optimize(&income, &DeductionClaim::new());

        assert!(matches!(result, Err(TaxEngineError::InvalidInput { .. })));
    }

    #[test]
    fn one_bad_regime_fails_the_whole_optimization() {
        let broken = RegimeConfig::new("broken", vec![TaxSlab::new(dec!(0), dec!(10), dec!(0.1))]);
        let regimes = vec![flat_regime("ok", dec!(0.10)), broken];

        let result = RegimeOptimizer::new(&regimes).optimize(&salary(dec!(1000)), &DeductionClaim::new());

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidSlabTable {
                regime_id: "broken".to_string(),
                reason: "last slab must be unbounded".to_string(),
            })
        );
    }

    #[test]
    fn gross_income_beyond_decimal_range_is_an_error() {
        let regimes = vec![flat_regime("flat", dec!(0.10))];
        let huge = dec!(50000000000000000000000000000);
        let income = salary(huge).with(IncomeCategory::HraAllowance, huge);

        let result = RegimeOptimizer::new(&regimes).optimize(&income, &DeductionClaim::new());

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidInput {
                field: "gross_income".to_string(),
                reason: "amount out of range".to_string(),
            })
        );
    }

    #[test]
    fn standard_deduction_plus_claims_beyond_range_is_an_error() {
        let regimes = vec![
            flat_regime("flat", dec!(0.10))
                .with_eligibility(DeductionEligibility::All)
                .with_standard_deduction(rust_decimal::Decimal::MAX),
        ];
        let claims = DeductionClaim::new().with(sections::SEC_80G, dec!(1));

        let result = RegimeOptimizer::new(&regimes).optimize(&salary(dec!(100)), &claims);

        assert!(matches!(
            result,
            Err(TaxEngineError::InvalidInput { ref field, .. }) if field == "deductions_allowed"
        ));
    }
}
