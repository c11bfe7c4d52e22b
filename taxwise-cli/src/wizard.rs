//! Step-by-step collection of income and claims.
//!
//! The wizard holds the in-progress profile while the user moves between
//! steps. Nothing is computed until the user advances past the deductions
//! step; the result is dropped again as soon as they step back to edit.

use std::fmt;

use serde::Serialize;
use taxwise_core::calculations::{OptimizationResult, RegimeOptimizer};
use taxwise_core::{
    Amount, DeductionClaim, IncomeCategory, IncomeProfile, RegimeConfig, TaxEngineError,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    CollectingIncome,
    CollectingDeductions,
    ShowingResults,
}

impl fmt::Display for WizardStep {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::CollectingIncome => "collecting income",
            Self::CollectingDeductions => "collecting deductions",
            Self::ShowingResults => "showing results",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WizardError {
    #[error("cannot {action} while {step}")]
    WrongStep {
        action: &'static str,
        step: WizardStep,
    },

    #[error(transparent)]
    Engine(#[from] TaxEngineError),
}

/// In-memory state of one optimization session.
#[derive(Debug, Clone)]
pub struct Wizard {
    regimes: Vec<RegimeConfig>,
    step: WizardStep,
    income: IncomeProfile,
    claims: DeductionClaim,
    result: Option<OptimizationResult>,
}

impl Wizard {
    /// Starts a session that will compare `regimes`.
    pub fn new(regimes: Vec<RegimeConfig>) -> Self {
        Self {
            regimes,
            step: WizardStep::CollectingIncome,
            income: IncomeProfile::new(),
            claims: DeductionClaim::new(),
            result: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn income(&self) -> &IncomeProfile {
        &self.income
    }

    pub fn claims(&self) -> &DeductionClaim {
        &self.claims
    }

    /// The optimization result; present only while showing results.
    pub fn result(&self) -> Option<&OptimizationResult> {
        self.result.as_ref()
    }

    /// Records one income category. Only allowed while collecting income.
    pub fn set_income(
        &mut self,
        category: IncomeCategory,
        amount: Amount,
    ) -> Result<(), WizardError> {
        self.require(WizardStep::CollectingIncome, "edit income")?;
        IncomeProfile::new().with(category, amount).validate()?;
        self.income.set(category, amount);
        Ok(())
    }

    /// Records one deduction claim. Only allowed while collecting deductions.
    pub fn set_claim(
        &mut self,
        section: &str,
        amount: Amount,
    ) -> Result<(), WizardError> {
        self.require(WizardStep::CollectingDeductions, "edit deductions")?;
        DeductionClaim::new().with(section, amount).validate()?;
        self.claims.set(section, amount);
        Ok(())
    }

    /// Running sum of all income categories entered so far. Saturates
    /// instead of overflowing; the optimizer reports out-of-range totals.
    pub fn total_income(&self) -> Amount {
        self.income
            .iter()
            .fold(Amount::ZERO, |total, (_, amount)| total.saturating_add(amount))
    }

    /// Running sum of all claims entered so far, before caps.
    pub fn total_claimed(&self) -> Amount {
        self.claims.total_claimed()
    }

    /// Moves to the next step.
    ///
    /// Leaving the deductions step runs the optimizer; if it fails the
    /// wizard stays where it was.
    pub fn advance(&mut self) -> Result<WizardStep, WizardError> {
        let next = match self.step {
            WizardStep::CollectingIncome => WizardStep::CollectingDeductions,
            WizardStep::CollectingDeductions => {
                let result =
                    RegimeOptimizer::new(&self.regimes).optimize(&self.income, &self.claims)?;
                self.result = Some(result);
                WizardStep::ShowingResults
            }
            WizardStep::ShowingResults => {
                return Err(WizardError::WrongStep {
                    action: "advance",
                    step: self.step,
                });
            }
        };

        debug!(from = %self.step, to = %next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Moves to the previous step, keeping entered data.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = match self.step {
            WizardStep::CollectingIncome => {
                return Err(WizardError::WrongStep {
                    action: "go back",
                    step: self.step,
                });
            }
            WizardStep::CollectingDeductions => WizardStep::CollectingIncome,
            WizardStep::ShowingResults => {
                self.result = None;
                WizardStep::CollectingDeductions
            }
        };

        debug!(from = %self.step, to = %previous, "Wizard went back");
        self.step = previous;
        Ok(previous)
    }

    /// Clears all entered data and returns to the first step.
    pub fn reset(&mut self) {
        self.income.clear();
        self.claims.clear();
        self.result = None;
        self.step = WizardStep::CollectingIncome;
        debug!("Wizard reset");
    }

    fn require(
        &self,
        step: WizardStep,
        action: &'static str,
    ) -> Result<(), WizardError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                action,
                step: self.step,
            })
        }
    }
}
