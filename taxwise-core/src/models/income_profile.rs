use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    BasicSalary,
    HraAllowance,
    OtherAllowances,
    FreelanceIncome,
    InvestmentIncome,
    RentalIncome,
}

impl IncomeCategory {
    pub fn all() -> &'static [IncomeCategory] {
        &[
            IncomeCategory::BasicSalary,
            IncomeCategory::HraAllowance,
            IncomeCategory::OtherAllowances,
            IncomeCategory::FreelanceIncome,
            IncomeCategory::InvestmentIncome,
            IncomeCategory::RentalIncome,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicSalary => "basic_salary",
            Self::HraAllowance => "hra_allowance",
            Self::OtherAllowances => "other_allowances",
            Self::FreelanceIncome => "freelance_income",
            Self::InvestmentIncome => "investment_income",
            Self::RentalIncome => "rental_income",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == s)
    }

    /// Human-readable label used by the wizard and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BasicSalary => "Basic Salary",
            Self::HraAllowance => "HRA Allowance",
            Self::OtherAllowances => "Other Allowances",
            Self::FreelanceIncome => "Freelance/Business Income",
            Self::InvestmentIncome => "Investment Income",
            Self::RentalIncome => "Rental Income",
        }
    }
}

/// Annual income broken down by category.
///
/// Categories that were never set read as zero, so a profile with a missing
/// key aggregates exactly like one with that key set to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomeProfile {
    amounts: BTreeMap<IncomeCategory, Amount>,
}

impl IncomeProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(
        mut self,
        category: IncomeCategory,
        amount: Amount,
    ) -> Self {
        self.set(category, amount);
        self
    }

    pub fn set(
        &mut self,
        category: IncomeCategory,
        amount: Amount,
    ) {
        self.amounts.insert(category, amount);
    }

    pub fn get(
        &self,
        category: IncomeCategory,
    ) -> Amount {
        self.amounts
            .get(&category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IncomeCategory, Amount)> + '_ {
        self.amounts.iter().map(|(c, a)| (*c, *a))
    }

    pub fn clear(&mut self) {
        self.amounts.clear();
    }

    /// Rejects any negative category amount.
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        for (category, amount) in self.iter() {
            if amount < Decimal::ZERO {
                return Err(TaxEngineError::invalid_input(
                    category.as_str(),
                    format!("amount must be non-negative, got {amount}"),
                ));
            }
        }
        Ok(())
    }
}
