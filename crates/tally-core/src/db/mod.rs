//! SQLite persistence layer with connection pooling and migrations
//!
//! The store honors one contract the ingestion pipeline depends on: upserts
//! are keyed on `raw_location`, existing rows are silently skipped, and a
//! manually sourced category is never downgraded back to auto.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod transactions;

pub use transactions::UpsertStats;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }

    pub(crate) fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                txn_date TEXT NOT NULL,
                txn_type TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                category_source TEXT NOT NULL DEFAULT 'auto',
                merchant TEXT NOT NULL,
                amount_cents INTEGER NOT NULL,
                bank TEXT NOT NULL,
                raw_location TEXT NOT NULL UNIQUE
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_category_source
                ON expenses(category_source);
            "#,
        )?;

        info!(path = %self.db_path, "database migrations complete");
        Ok(())
    }
}
