use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use taxwise_core::calculations::amount_from_f64;
use taxwise_core::{DeductionClaim, IncomeCategory, IncomeProfile, TaxEngineError, sections};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Compares Indian income-tax regimes and recommends the cheaper one.
///
/// Amounts are annual figures in rupees.
#[derive(Debug, Parser)]
#[command(name = "taxwise", version)]
pub struct Cli {
    /// Log level or filter directive (e.g. `debug`, `taxwise_core=trace`).
    /// Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate income and deductions under every regime.
    Optimize(OptimizeArgs),

    /// Indicative credit score from payment-history figures.
    CreditScore(CreditScoreArgs),
}

#[derive(Debug, Clone, Args)]
pub struct OptimizeArgs {
    #[arg(long, default_value_t = 0.0)]
    pub basic_salary: f64,

    #[arg(long, default_value_t = 0.0)]
    pub hra: f64,

    #[arg(long, default_value_t = 0.0)]
    pub other_allowances: f64,

    /// Freelance or business income.
    #[arg(long, default_value_t = 0.0)]
    pub freelance: f64,

    /// Interest, dividends and capital gains.
    #[arg(long, default_value_t = 0.0)]
    pub investment: f64,

    #[arg(long, default_value_t = 0.0)]
    pub rental: f64,

    /// Section 80C investments (PPF, ELSS, life insurance premiums).
    #[arg(long = "sec-80c", default_value_t = 0.0)]
    pub sec_80c: f64,

    /// Section 80D health insurance premiums.
    #[arg(long = "sec-80d", default_value_t = 0.0)]
    pub sec_80d: f64,

    /// Interest paid on a home loan.
    #[arg(long, default_value_t = 0.0)]
    pub home_loan_interest: f64,

    /// Section 80G donations.
    #[arg(long = "sec-80g", default_value_t = 0.0)]
    pub sec_80g: f64,

    /// CSV file overriding the built-in slab tables
    /// (`regime,lower_bound,upper_bound,rate`).
    #[arg(long)]
    pub slabs: Option<PathBuf>,

    /// Print the full result as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

impl OptimizeArgs {
    /// Income entered on the command line. Zero flags are left out.
    pub fn income(&self) -> Result<IncomeProfile, TaxEngineError> {
        let entered = [
            (IncomeCategory::BasicSalary, self.basic_salary),
            (IncomeCategory::HraAllowance, self.hra),
            (IncomeCategory::OtherAllowances, self.other_allowances),
            (IncomeCategory::FreelanceIncome, self.freelance),
            (IncomeCategory::InvestmentIncome, self.investment),
            (IncomeCategory::RentalIncome, self.rental),
        ];

        let mut profile = IncomeProfile::new();
        for (category, value) in entered {
            if value != 0.0 {
                profile.set(category, amount_from_f64(category.as_str(), value)?);
            }
        }
        Ok(profile)
    }

    /// Claims entered on the command line. Zero flags are left out.
    pub fn claims(&self) -> Result<DeductionClaim, TaxEngineError> {
        let entered = [
            (sections::SEC_80C, self.sec_80c),
            (sections::SEC_80D, self.sec_80d),
            (sections::HOME_LOAN_INTEREST, self.home_loan_interest),
            (sections::SEC_80G, self.sec_80g),
        ];

        let mut claims = DeductionClaim::new();
        for (section, value) in entered {
            if value != 0.0 {
                claims.set(section, amount_from_f64(section, value)?);
            }
        }
        Ok(claims)
    }
}

#[derive(Debug, Clone, Args)]
pub struct CreditScoreArgs {
    /// Number of payments made after their due date.
    #[arg(long, default_value_t = 0)]
    pub late_payments: u32,

    /// Outstanding credit as a percentage of the total limit.
    #[arg(long, default_value_t = 0.0)]
    pub utilization: f64,

    /// Number of distinct credit accounts.
    #[arg(long, default_value_t = 0)]
    pub accounts: u32,

    /// Print the metrics as JSON.
    #[arg(long)]
    pub json: bool,
}
