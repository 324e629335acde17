//! AdminKit
//!
//! Metadata-driven CRUD administration toolkit.
//!
//! This is the main entry point for the command-line front end.

use adminkit_cli::Cli;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = adminkit_cli::load_settings(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    adminkit_cli::run(cli, &settings)
}
