//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Bank statement ingestion and categorization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "tally.db")]
    pub db: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Ingest a directory of statement files
    Ingest {
        /// Directory containing statement CSV exports
        #[arg(long)]
        dir: PathBuf,

        /// Directory of curated category lists (one file per category)
        #[arg(long, default_value = "categories")]
        categories: PathBuf,

        /// Skip the AI classification pass even when OLLAMA_HOST is set
        #[arg(long)]
        no_ai: bool,
    },

    /// Show store counts and categorization coverage
    Status,
}
