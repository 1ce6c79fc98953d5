//! Atlas command line.
//!
//! Thin shell over the `atlas-*` crates: parses arguments, installs logging,
//! loads configuration and runs one command.

mod cli;
mod commands;
mod render;

use clap::Parser;
use cli::{AdminCommand, Cli, Commands};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,atlas=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    tracing::debug!("Starting Atlas v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Classify(args) => commands::classify_query(&args),
        Commands::Lookup(args) => commands::lookup(args).await,
        Commands::Config(command) => commands::config(&command),
        Commands::Admin(AdminCommand::AddCredits(args)) => commands::add_credits(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
