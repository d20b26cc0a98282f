//! Command implementations

mod core;
mod ingest;

pub use core::{cmd_init, cmd_status};
pub use ingest::cmd_ingest;

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::Database;

/// Open the database, creating it (and running migrations) if needed
fn open_db(db_path: &Path) -> Result<Database> {
    let path = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path).with_context(|| format!("Failed to open database: {}", path))
}
