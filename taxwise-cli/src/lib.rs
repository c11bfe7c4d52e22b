pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
pub mod wizard;

pub use cli::Cli;
pub use commands::run;
