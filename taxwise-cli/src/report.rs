//! Plain-text rendering of optimization and credit results.

use std::fmt::Write;

use rust_decimal::Decimal;
use taxwise_core::calculations::{OptimizationResult, round_half_up};
use taxwise_core::credit::CreditMetrics;

const RUPEE: char = '₹';

/// Formats `amount` as rupees with Indian digit grouping.
///
/// The last three integer digits form one group and every two digits before
/// them another, e.g. `₹12,34,567.50`. Always shows two decimals.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("{sign}{RUPEE}{}.{fraction}", group_indian(whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push(',');
    grouped.push_str(tail);
    grouped
}

/// Renders a side-by-side comparison of every evaluated regime.
pub fn render_optimization(result: &OptimizationResult) -> String {
    let mut out = String::new();

    let gross = result
        .evaluations
        .first()
        .map(|e| e.result.gross_income)
        .unwrap_or_default();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Gross income: {}", format_inr(gross));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<8} {:>16} {:>16} {:>16} {:>14} {:>16}",
        "Regime", "Deductions", "Taxable", "Base tax", "Cess", "Total"
    );

    for evaluation in &result.evaluations {
        let r = &evaluation.result;
        let marker = if r.regime_id == result.recommended_regime_id {
            " *"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:<8} {:>16} {:>16} {:>16} {:>14} {:>16}{marker}",
            r.regime_id,
            format_inr(r.deductions_allowed),
            format_inr(r.taxable_income),
            format_inr(r.base_tax),
            format_inr(r.cess),
            format_inr(r.total_liability),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Recommended regime: {} (saves {})",
        result.recommended_regime_id,
        format_inr(result.savings_delta)
    );

    let warnings = warnings(result);
    if !warnings.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Warnings:");
        for warning in warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    out
}

/// Cap overflow and ineligible-section notes, per regime.
pub fn warnings(result: &OptimizationResult) -> Vec<String> {
    let mut notes = Vec::new();

    for evaluation in &result.evaluations {
        let regime_id = &evaluation.result.regime_id;
        for (section, excess) in &evaluation.deductions.overflow {
            notes.push(format!(
                "{regime_id}: {section} claim exceeds its cap by {}; the excess is ignored",
                format_inr(*excess)
            ));
        }
        if !evaluation.ineligible_sections.is_empty() {
            notes.push(format!(
                "{regime_id}: not eligible for {}",
                evaluation.ineligible_sections.join(", ")
            ));
        }
    }

    notes
}

/// Renders the credit summary.
pub fn render_credit(metrics: &CreditMetrics) -> String {
    format!(
        "Credit score:       {} ({})\n\
         Late payments:      {}\n\
         Credit utilization: {}%\n\
         Accounts:           {}\n",
        metrics.score,
        metrics.health().label(),
        metrics.late_payments,
        metrics.credit_utilization_percent,
        metrics.distinct_accounts,
    )
}
