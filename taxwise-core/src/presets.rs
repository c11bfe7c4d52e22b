//! Built-in regime configurations.
//!
//! Indian income-tax regimes for FY 2024-25 (assessment year 2025-26), as
//! amended by the July 2024 budget. Only sections the product collects are
//! modelled; the section 87A rebate and surcharge on very high incomes are
//! not applied.

use rust_decimal::Decimal;

use crate::models::{DeductionEligibility, RegimeConfig, TaxSlab, sections};

/// Identifier of the old (itemised) regime.
pub const OLD_REGIME: &str = "old";
/// Identifier of the new (concessional) regime.
pub const NEW_REGIME: &str = "new";

fn rupees(amount: i64) -> Decimal {
    Decimal::from(amount)
}

fn percent(rate: i64) -> Decimal {
    Decimal::new(rate, 2)
}

/// Health and education cess on income tax.
pub fn cess_rate() -> Decimal {
    percent(4)
}

/// Old regime: itemised deductions allowed, ₹50,000 standard deduction.
pub fn india_old_regime() -> RegimeConfig {
    RegimeConfig::new(
        OLD_REGIME,
        vec![
            TaxSlab::new(rupees(0), rupees(250_000), percent(0)),
            TaxSlab::new(rupees(250_000), rupees(500_000), percent(5)),
            TaxSlab::new(rupees(500_000), rupees(1_000_000), percent(20)),
            TaxSlab::unbounded(rupees(1_000_000), percent(30)),
        ],
    )
    .with_eligibility(DeductionEligibility::sections([
        sections::SEC_80C,
        sections::SEC_80D,
        sections::HOME_LOAN_INTEREST,
        sections::SEC_80G,
    ]))
    .with_cap(sections::SEC_80C, rupees(150_000))
    .with_cap(sections::SEC_80D, rupees(25_000))
    .with_cap(sections::HOME_LOAN_INTEREST, rupees(200_000))
    .with_standard_deduction(rupees(50_000))
    .with_cess_rate(cess_rate())
}

/// New regime: no itemised deductions, ₹75,000 standard deduction.
pub fn india_new_regime() -> RegimeConfig {
    RegimeConfig::new(
        NEW_REGIME,
        vec![
            TaxSlab::new(rupees(0), rupees(300_000), percent(0)),
            TaxSlab::new(rupees(300_000), rupees(700_000), percent(5)),
            TaxSlab::new(rupees(700_000), rupees(1_000_000), percent(10)),
            TaxSlab::new(rupees(1_000_000), rupees(1_200_000), percent(15)),
            TaxSlab::new(rupees(1_200_000), rupees(1_500_000), percent(20)),
            TaxSlab::unbounded(rupees(1_500_000), percent(30)),
        ],
    )
    .with_eligibility(DeductionEligibility::None)
    .with_standard_deduction(rupees(75_000))
    .with_cess_rate(cess_rate())
}

/// Both regimes, old first, so the old regime wins a tie.
pub fn india_fy2024_25() -> Vec<RegimeConfig> {
    vec![india_old_regime(), india_new_regime()]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::RegimeOptimizer;
    use crate::models::{DeductionClaim, IncomeCategory, IncomeProfile};

    #[test]
    fn presets_are_valid() {
        for regime in india_fy2024_25() {
            assert_eq!(regime.validate(), Ok(()), "regime {}", regime.regime_id);
        }
    }

    #[test]
    fn old_regime_caps_match_form_limits() {
        let regime = india_old_regime();

        assert_eq!(regime.deduction_caps[sections::SEC_80C], dec!(150000));
        assert_eq!(regime.deduction_caps[sections::SEC_80D], dec!(25000));
        assert_eq!(regime.deduction_caps[sections::HOME_LOAN_INTEREST], dec!(200000));
        assert!(!regime.deduction_caps.contains_key(sections::SEC_80G));
    }

    #[test]
    fn new_regime_ignores_itemised_claims() {
        assert!(!india_new_regime().eligibility.allows(sections::SEC_80C));
    }

    #[test]
    fn heavy_deductions_favour_old_regime() {
        let regimes = india_fy2024_25();
        let income = IncomeProfile::new()
            .with(IncomeCategory::BasicSalary, dec!(800000))
            .with(IncomeCategory::HraAllowance, dec!(150000));
        let claims = DeductionClaim::new()
            .with(sections::SEC_80C, dec!(150000))
            .with(sections::SEC_80D, dec!(25000))
            .with(sections::HOME_LOAN_INTEREST, dec!(200000));

        let result = RegimeOptimizer::new(&regimes).optimize(&income, &claims).unwrap();

        // old: 950000 - 50000 - 375000 = 525000 -> 12500 + 5000 = 17500 -> 18200
        // new: 950000 - 75000 = 875000 -> 20000 + 17500 = 37500 -> 39000
        assert_eq!(result.evaluation(OLD_REGIME).unwrap().result.total_liability, dec!(18200));
        assert_eq!(result.evaluation(NEW_REGIME).unwrap().result.total_liability, dec!(39000));
        assert_eq!(result.recommended_regime_id, OLD_REGIME);
        assert_eq!(result.savings_delta, dec!(20800));
    }

    #[test]
    fn no_deductions_favour_new_regime() {
        let regimes = india_fy2024_25();
        let income = IncomeProfile::new().with(IncomeCategory::BasicSalary, dec!(1500000));

        let result = RegimeOptimizer::new(&regimes)
            .optimize(&income, &DeductionClaim::new())
            .unwrap();

        // old: 1450000 -> 12500 + 100000 + 135000 = 247500 -> 257400
        // new: 1425000 -> 20000 + 30000 + 30000 + 45000 = 125000 -> 130000
        assert_eq!(result.evaluation(OLD_REGIME).unwrap().result.total_liability, dec!(257400));
        assert_eq!(result.evaluation(NEW_REGIME).unwrap().result.total_liability, dec!(130000));
        assert_eq!(result.recommended_regime_id, NEW_REGIME);
    }
}
