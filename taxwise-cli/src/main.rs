use clap::Parser;

use taxwise_cli::{Cli, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let output = taxwise_cli::run(&cli)?;
    print!("{output}");

    Ok(())
}
