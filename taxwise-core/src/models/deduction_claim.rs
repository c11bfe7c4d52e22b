use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::Amount;

/// Well-known deduction section identifiers.
pub mod sections {
    /// PPF, ELSS, life insurance, EPF.
    pub const SEC_80C: &str = "80C";
    /// Medical insurance premium.
    pub const SEC_80D: &str = "80D";
    /// Interest on a self-occupied property loan.
    pub const HOME_LOAN_INTEREST: &str = "home-loan-interest";
    /// Donations to eligible institutions.
    pub const SEC_80G: &str = "80G";
}

/// Deduction amounts claimed per section, before any cap is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionClaim {
    claims: BTreeMap<String, Amount>,
}

impl DeductionClaim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        section: impl Into<String>,
        amount: Amount,
    ) -> Self {
        self.set(section, amount);
        self
    }

    pub fn set(
        &mut self,
        section: impl Into<String>,
        amount: Amount,
    ) {
        self.claims.insert(section.into(), amount);
    }

    pub fn get(
        &self,
        section: &str,
    ) -> Amount {
        self.claims.get(section).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> + '_ {
        self.claims.iter().map(|(s, a)| (s.as_str(), *a))
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }

    /// Sum of the raw claimed amounts, ignoring caps. Saturates at
    /// [`Decimal::MAX`].
    pub fn total_claimed(&self) -> Amount {
        self.claims
            .values()
            .fold(Decimal::ZERO, |total, amount| total.saturating_add(*amount))
    }

    /// Rejects any negative claim.
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        for (section, amount) in self.iter() {
            if amount < Decimal::ZERO {
                return Err(TaxEngineError::invalid_input(
                    section,
                    format!("claim must be non-negative, got {amount}"),
                ));
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Amount)> for DeductionClaim {
    fn from_iter<I: IntoIterator<Item = (String, Amount)>>(iter: I) -> Self {
        Self {
            claims: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_claimed_saturates_instead_of_overflowing() {
        let claims = DeductionClaim::new()
            .with(sections::SEC_80G, Decimal::MAX)
            .with(sections::SEC_80C, dec!(1));

        assert_eq!(claims.total_claimed(), Decimal::MAX);
    }

    #[test]
    fn total_claimed_sums_all_sections() {
        let claims = DeductionClaim::new()
            .with(sections::SEC_80C, dec!(150000))
            .with(sections::SEC_80D, dec!(25000))
            .with(sections::SEC_80G, dec!(5000));

        assert_eq!(claims.total_claimed(), dec!(180000));
        assert_eq!(claims.len(), 3);
    }

    #[test]
    fn unknown_section_reads_as_zero() {
        let claims = DeductionClaim::new();

        assert_eq!(claims.get(sections::HOME_LOAN_INTEREST), dec!(0));
        assert!(claims.is_empty());
    }

    #[test]
    fn validate_names_the_offending_section() {
        let claims = DeductionClaim::new()
            .with(sections::SEC_80C, dec!(1000))
            .with(sections::SEC_80D, dec!(-0.01));

        let result = claims.validate();

        match result {
            Err(TaxEngineError::InvalidInput { field, .. }) => assert_eq!(field, "80D"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
