//! Init and status commands

use std::path::Path;

use anyhow::Result;

use super::open_db;

pub fn cmd_init(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    println!("✅ Database initialized at {}", db.path());
    Ok(())
}

pub fn cmd_status(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    let total = db.count_transactions()?;
    let uncategorized = db.count_uncategorized()?;
    let overrides = db.manual_merchant_categories()?;

    println!("📊 Tally status");
    println!("   Transactions: {}", total);
    println!("   Uncategorized: {}", uncategorized);
    println!("   Manual merchant overrides: {}", overrides.len());

    Ok(())
}
