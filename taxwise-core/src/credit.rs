//! Credit-health summarizer.
//!
//! Derives descriptive metrics and an indicative CIBIL-style score from
//! already-parsed credit transactions. The tax engine does not depend on this
//! module.
//!
//! # Scoring
//!
//! | Component | Effect |
//! |-----------|--------|
//! | Base | 700 |
//! | Late payments | −30 each |
//! | Utilization above 20% | −2 per percentage point |
//! | Distinct accounts | −5 each |
//! | No late payments and utilization below 30% | +50 |
//!
//! Utilization enters the score unrounded; only the reported figure is
//! rounded to two places. The result is clamped to `[300, 850]` and
//! truncated to an integer.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::Amount;

/// Credit limit assumed when no record carries a usable limit.
pub const DEFAULT_CREDIT_LIMIT: i64 = 100_000;

pub const MIN_SCORE: u32 = 300;
pub const MAX_SCORE: u32 = 850;

/// One row of a loan / credit-card export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub date: NaiveDate,
    /// Free-form type, e.g. "Credit Card Payment" or "EMI".
    pub kind: String,
    pub amount: Amount,
    pub account_name: String,
    pub paid_on_time: bool,
    pub credit_limit: Option<Amount>,
}

impl CreditTransaction {
    /// Whether this row counts toward credit utilization.
    pub fn is_credit(&self) -> bool {
        self.kind.to_lowercase().contains("credit")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreHealth {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreHealth {
    pub fn from_score(score: u32) -> Self {
        match score {
            750.. => Self::Excellent,
            650..=749 => Self::Good,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditMetrics {
    pub score: u32,
    pub late_payments: u32,
    /// Outstanding credit as a percentage of total limit, two decimals.
    pub credit_utilization_percent: Decimal,
    pub distinct_accounts: u32,
}

impl CreditMetrics {
    pub fn health(&self) -> ScoreHealth {
        ScoreHealth::from_score(self.score)
    }
}

/// Interprets a "paid on time" cell. Accepts `true`, `1`, `yes`, `y`.
pub fn parse_paid_on_time(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

/// Computes metrics and the indicative score for `transactions`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use taxwise_core::credit::{CreditTransaction, compute_metrics};
///
/// let rows = vec![CreditTransaction {
///     date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     kind: "Credit Card".to_string(),
///     amount: dec!(10000),
///     account_name: "HDFC CC".to_string(),
///     paid_on_time: true,
///     credit_limit: Some(dec!(100000)),
/// }];
///
/// let metrics = compute_metrics(&rows);
///
/// assert_eq!(metrics.credit_utilization_percent, dec!(10.00));
/// assert_eq!(metrics.score, 745);
/// ```
pub fn compute_metrics(transactions: &[CreditTransaction]) -> CreditMetrics {
    let late_payments = saturating_u32(transactions.iter().filter(|t| !t.paid_on_time).count());
    let utilization = utilization_percent(transactions);
    let distinct_accounts = saturating_u32(
        transactions
            .iter()
            .map(|t| t.account_name.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
    );

    CreditMetrics {
        score: score(late_payments, utilization, distinct_accounts),
        late_payments,
        credit_utilization_percent: round_half_up(utilization),
        distinct_accounts,
    }
}

/// Computes the indicative score from already-derived metrics.
pub fn score(
    late_payments: u32,
    utilization_percent: Decimal,
    distinct_accounts: u32,
) -> u32 {
    let mut score = Decimal::from(700);
    score -= Decimal::from(late_payments) * Decimal::from(30);
    score -= (utilization_percent - Decimal::from(20)).max(Decimal::ZERO) * Decimal::TWO;
    score -= Decimal::from(distinct_accounts) * Decimal::from(5);

    if late_payments == 0 && utilization_percent < Decimal::from(30) {
        score += Decimal::from(50);
    }

    let clamped = score
        .max(Decimal::from(MIN_SCORE))
        .min(Decimal::from(MAX_SCORE))
        .trunc();
    clamped.to_u32().unwrap_or(MIN_SCORE)
}

fn saturating_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn utilization_percent(transactions: &[CreditTransaction]) -> Decimal {
    let credit: Vec<_> = transactions.iter().filter(|t| t.is_credit()).collect();
    let outstanding = credit
        .iter()
        .fold(Decimal::ZERO, |total, t| total.saturating_add(t.amount));
    let total_limit = credit
        .iter()
        .filter_map(|t| t.credit_limit)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let limit = if total_limit > Decimal::ZERO {
        total_limit
    } else {
        Decimal::from(DEFAULT_CREDIT_LIMIT)
    };

    (outstanding / limit).saturating_mul(Decimal::ONE_HUNDRED)
}
