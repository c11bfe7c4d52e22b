use thiserror::Error;

/// Errors raised by the tax engine.
///
/// Cap overflow on a deduction claim is not an error; it is reported through
/// [`CappedClaims::overflow`](crate::calculations::CappedClaims::overflow).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// A monetary input was negative or not a finite number.
    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A regime configuration is malformed (slab table, cess rate, caps).
    #[error("invalid slab table for regime '{regime_id}': {reason}")]
    InvalidSlabTable { regime_id: String, reason: String },

    /// The optimizer was given no regimes to compare.
    #[error("no tax regimes provided")]
    NoRegimes,
}

impl TaxEngineError {
    pub(crate) fn invalid_input(
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_slab_table(
        regime_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSlabTable {
            regime_id: regime_id.into(),
            reason: reason.into(),
        }
    }
}
