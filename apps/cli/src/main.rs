#![deny(warnings)]

//! Headless balance calculator: prints upgrade, enemy, run, experience and
//! drop-rate reports from a tuning catalog.

mod args;
mod format;
mod report;

use anyhow::Result;
use args::Command;
use balance_config::TuningConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = args::parse_args(std::env::args().skip(1))?;
    match cli.command {
        Command::Version => {
            println!(
                "balance {} ({} {})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_SHA"),
                env!("BUILD_DATE")
            );
            return Ok(());
        }
        Command::Help => {
            print!("{}", args::USAGE);
            return Ok(());
        }
        _ => {}
    }

    let cfg = match &cli.config {
        Some(path) => TuningConfig::load(path)?,
        None => TuningConfig::builtin()?,
    };
    debug!(command = cli.command.name(), json = cli.json, "running report");
    print!("{}", report::render(&cfg, &cli.command, cli.json)?);
    Ok(())
}
