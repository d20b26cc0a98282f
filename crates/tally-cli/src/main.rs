//! Tally CLI - bank statement ingestion and categorization
//!
//! Usage:
//!   tally init                                Initialize database
//!   tally ingest --dir statements/            Ingest statement exports
//!   tally status                              Show store counts

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Ingest {
            dir,
            categories,
            no_ai,
        } => commands::cmd_ingest(&cli.db, &dir, &categories, no_ai).await,
        Commands::Status => commands::cmd_status(&cli.db),
    }
}
