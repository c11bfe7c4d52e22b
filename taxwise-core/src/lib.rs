pub mod calculations;
pub mod credit;
pub mod error;
pub mod models;
pub mod presets;

pub use error::TaxEngineError;
pub use models::*;
