use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::{Amount, TaxSlab, validate_slab_table};

/// Which deduction sections a regime honours.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", content = "sections", rename_all = "snake_case")]
pub enum DeductionEligibility {
    /// No itemised deductions; only the standard deduction applies.
    #[default]
    None,
    /// Every claimed section is eligible.
    All,
    /// Only the listed sections are eligible.
    Sections(BTreeSet<String>),
}

impl DeductionEligibility {
    pub fn sections<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sections(sections.into_iter().map(Into::into).collect())
    }

    pub fn allows(
        &self,
        section: &str,
    ) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Sections(allowed) => allowed.contains(section),
        }
    }
}

/// Static configuration for one tax regime.
///
/// Loaded once at start-up and shared by reference; never mutated while
/// calculations are running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeConfig {
    pub regime_id: String,
    pub slabs: Vec<TaxSlab>,
    pub eligibility: DeductionEligibility,
    /// Per-section caps. Sections missing from this table are uncapped.
    pub deduction_caps: BTreeMap<String, Amount>,
    pub standard_deduction: Amount,
    /// Health and education cess applied to the slab tax.
    pub cess_rate: Decimal,
}

impl RegimeConfig {
    /// Creates a regime with no eligible deductions, no standard deduction
    /// and no cess.
    pub fn new(
        regime_id: impl Into<String>,
        slabs: Vec<TaxSlab>,
    ) -> Self {
        Self {
            regime_id: regime_id.into(),
            slabs,
            eligibility: DeductionEligibility::None,
            deduction_caps: BTreeMap::new(),
            standard_deduction: Decimal::ZERO,
            cess_rate: Decimal::ZERO,
        }
    }

    pub fn with_eligibility(
        mut self,
        eligibility: DeductionEligibility,
    ) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn with_cap(
        mut self,
        section: impl Into<String>,
        cap: Amount,
    ) -> Self {
        self.deduction_caps.insert(section.into(), cap);
        self
    }

    pub fn with_standard_deduction(
        mut self,
        amount: Amount,
    ) -> Self {
        self.standard_deduction = amount;
        self
    }

    pub fn with_cess_rate(
        mut self,
        rate: Decimal,
    ) -> Self {
        self.cess_rate = rate;
        self
    }

    /// Validates the slab table, cess rate, standard deduction and caps.
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        validate_slab_table(&self.regime_id, &self.slabs)?;

        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(TaxEngineError::invalid_slab_table(
                &self.regime_id,
                format!("cess rate must be between 0 and 1, got {}", self.cess_rate),
            ));
        }
        if self.standard_deduction < Decimal::ZERO {
            return Err(TaxEngineError::invalid_slab_table(
                &self.regime_id,
                format!(
                    "standard deduction must be non-negative, got {}",
                    self.standard_deduction
                ),
            ));
        }
        if let Some((section, cap)) = self
            .deduction_caps
            .iter()
            .find(|(_, cap)| **cap < Decimal::ZERO)
        {
            return Err(TaxEngineError::invalid_slab_table(
                &self.regime_id,
                format!("cap for section {section} must be non-negative, got {cap}"),
            ));
        }
        Ok(())
    }
}
