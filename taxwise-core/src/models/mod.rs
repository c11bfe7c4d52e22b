mod deduction_claim;
mod income_profile;
mod regime_config;
mod tax_slab;

pub use deduction_claim::{DeductionClaim, sections};
pub use income_profile::{IncomeCategory, IncomeProfile};
pub use regime_config::{DeductionEligibility, RegimeConfig};
pub use tax_slab::{TaxSlab, validate_slab_table};

/// Monetary amount in major units; the minor unit is 0.01.
pub type Amount = rust_decimal::Decimal;
