//! Tax calculation modules.
//!
//! The pipeline runs leaf first: [`income`] aggregates the income profile,
//! [`deductions`] clamps claims against statutory caps, [`regime`] walks a
//! slab table for one regime and [`optimizer`] compares every configured
//! regime and recommends the cheapest.

pub mod common;
pub mod deductions;
pub mod income;
pub mod optimizer;
pub mod regime;

pub use common::{amount_from_f64, checked_add, round_half_up};
pub use deductions::{CappedClaims, apply_caps};
pub use income::aggregate_income;
pub use optimizer::{OptimizationResult, RegimeEvaluation, RegimeOptimizer};
pub use regime::{RegimeCalculator, RegimeResult};
