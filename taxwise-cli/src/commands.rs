use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use taxwise_core::calculations::amount_from_f64;
use taxwise_core::credit::{self, CreditMetrics};
use taxwise_core::{RegimeConfig, presets};
use taxwise_data::SlabTableLoader;
use tracing::{debug, info};

use crate::cli::{Cli, Command, CreditScoreArgs, OptimizeArgs};
use crate::report;
use crate::wizard::Wizard;

/// Runs the parsed command and returns what should be printed on stdout.
pub fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Optimize(args) => optimize(args),
        Command::CreditScore(args) => credit_score(args),
    }
}

/// Built-in regimes, with slab tables replaced from `slabs` when given.
pub fn load_regimes(slabs: Option<&Path>) -> Result<Vec<RegimeConfig>> {
    let regimes = presets::india_fy2024_25();
    let Some(path) = slabs else {
        return Ok(regimes);
    };

    let file = File::open(path)
        .with_context(|| format!("cannot open slab table '{}'", path.display()))?;
    let regimes = SlabTableLoader::load(file, regimes)
        .with_context(|| format!("failed to load slab table '{}'", path.display()))?;

    info!(path = %path.display(), "Using slab table overrides");
    Ok(regimes)
}

/// Walks the wizard with the command-line figures and renders the result.
pub fn optimize(args: &OptimizeArgs) -> Result<String> {
    let regimes = load_regimes(args.slabs.as_deref())?;
    let mut wizard = Wizard::new(regimes);

    for (category, amount) in args.income()?.iter() {
        wizard.set_income(category, amount)?;
    }
    wizard.advance()?;

    for (section, amount) in args.claims()?.iter() {
        wizard.set_claim(section, amount)?;
    }
    debug!(
        total_income = %wizard.total_income(),
        total_claimed = %wizard.total_claimed(),
        "Inputs collected"
    );
    wizard.advance()?;

    let result = wizard
        .result()
        .context("wizard finished without a result")?;

    if args.json {
        serde_json::to_string_pretty(result)
            .map(|json| json + "\n")
            .context("failed to serialize result")
    } else {
        Ok(report::render_optimization(result))
    }
}

/// Scores the figures given on the command line.
pub fn credit_score(args: &CreditScoreArgs) -> Result<String> {
    let utilization = amount_from_f64("utilization", args.utilization)?;
    let metrics = CreditMetrics {
        score: credit::score(args.late_payments, utilization, args.accounts),
        late_payments: args.late_payments,
        credit_utilization_percent: utilization,
        distinct_accounts: args.accounts,
    };

    if args.json {
        serde_json::to_string_pretty(&metrics)
            .map(|json| json + "\n")
            .context("failed to serialize metrics")
    } else {
        Ok(report::render_credit(&metrics))
    }
}
