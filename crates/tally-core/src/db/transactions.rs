//! Transaction store operations

use std::collections::HashMap;
use std::str::FromStr;

use chrono::DateTime;
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Bank, CategorySource, Direction, Transaction};

/// Counts from one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub total: usize,
    pub inserted: usize,
    /// Rows whose locator already existed in the store
    pub skipped: usize,
}

impl Database {
    /// Upsert a batch of transactions in one store transaction.
    ///
    /// New rows are inserted; rows whose `raw_location` already exists are
    /// skipped untouched, which also means a previously stored manual
    /// category can never be overwritten by re-ingestion.
    pub fn upsert_transactions(&self, txns: &[Transaction]) -> Result<UpsertStats> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut stats = UpsertStats {
            total: txns.len(),
            ..Default::default()
        };

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO expenses
                    (id, txn_date, txn_type, category, category_source, merchant, amount_cents, bank, raw_location)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT (raw_location) DO NOTHING
                "#,
            )?;

            for txn in txns {
                let affected = stmt.execute(params![
                    txn.id,
                    txn.date.to_rfc3339(),
                    txn.direction.as_str(),
                    txn.category,
                    txn.category_source.as_str(),
                    txn.merchant,
                    txn.amount_cents,
                    txn.bank.as_str(),
                    txn.raw_location,
                ])?;
                if affected == 0 {
                    stats.skipped += 1;
                } else {
                    stats.inserted += 1;
                }
            }
        }

        tx.commit()?;
        Ok(stats)
    }

    /// Distinct merchant -> category pairs from manually categorised rows.
    ///
    /// These are the manual overrides consumed by the resolver at the start
    /// of a run.
    pub fn manual_merchant_categories(&self) -> Result<HashMap<String, String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT merchant, category FROM expenses
            WHERE category_source = 'manual' AND category != ''
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut result = HashMap::new();
        for row in rows {
            let (merchant, category) = row?;
            result.insert(merchant, category);
        }
        Ok(result)
    }

    /// Re-categorise one transaction by hand. Marks the row's category source
    /// as manual, which makes it an override for future runs.
    pub fn set_manual_category(&self, id: &str, category: &str) -> Result<bool> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE expenses SET category = ?, category_source = 'manual' WHERE id = ?",
            params![category, id],
        )?;
        Ok(affected > 0)
    }

    /// Number of stored transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of stored transactions still without a category
    pub fn count_uncategorized(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE category = ''",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// All stored transactions, ordered by locator (for tests and status)
    pub fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, txn_date, txn_type, category, category_source, merchant, amount_cents, bank, raw_location
            FROM expenses ORDER BY raw_location
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
                row.get::<_, String>(8)?,
            ))
        })?;

        let mut txns = Vec::new();
        for row in rows {
            let (id, date, direction, category, source, merchant, amount_cents, bank, locator) =
                row?;
            txns.push(Transaction {
                id,
                date: DateTime::parse_from_rfc3339(&date)
                    .map_err(|e| Error::InvalidData(format!("stored date {}: {}", date, e)))?,
                bank: Bank::from_str(&bank).map_err(Error::InvalidData)?,
                direction: Direction::from_str(&direction).map_err(Error::InvalidData)?,
                amount_cents,
                category,
                category_source: CategorySource::from_str(&source).map_err(Error::InvalidData)?,
                merchant,
                raw_location: locator,
            });
        }
        Ok(txns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_statement_date;
    use crate::identity;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        (dir, db)
    }

    fn txn(locator: &str, merchant: &str, category: &str) -> Transaction {
        Transaction {
            id: identity::transaction_id(locator),
            date: parse_statement_date("05DEC", "2024").unwrap(),
            bank: Bank::Uob,
            direction: Direction::Debit,
            amount_cents: 660,
            category: category.to_string(),
            category_source: CategorySource::Auto,
            merchant: merchant.to_string(),
            raw_location: locator.to_string(),
        }
    }

    #[test]
    fn test_upsert_then_reingest_is_noop() {
        let (_dir, db) = test_db();
        let txns = vec![
            txn("uob_dec_2024_0", "KOI THE - NEX", "drinks"),
            txn("uob_dec_2024_1", "NTUC FP-AMK", "groceries"),
        ];

        let first = db.upsert_transactions(&txns).unwrap();
        assert_eq!(first.inserted, 2);
        assert_eq!(first.skipped, 0);

        let second = db.upsert_transactions(&txns).unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(db.count_transactions().unwrap(), 2);
    }

    #[test]
    fn test_reingest_never_overwrites_manual_category() {
        let (_dir, db) = test_db();
        let original = txn("uob_dec_2024_0", "KOI THE - NEX", "drinks");
        db.upsert_transactions(std::slice::from_ref(&original))
            .unwrap();

        assert!(db.set_manual_category(&original.id, "misc").unwrap());

        // same locator comes back with an auto category on the next run
        let reingested = txn("uob_dec_2024_0", "KOI THE - NEX", "drinks");
        db.upsert_transactions(&[reingested]).unwrap();

        let stored = db.list_transactions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].category, "misc");
        assert_eq!(stored[0].category_source, CategorySource::Manual);
    }

    #[test]
    fn test_manual_merchant_categories() {
        let (_dir, db) = test_db();
        let a = txn("uob_dec_2024_0", "KOI THE - NEX", "drinks");
        let b = txn("uob_dec_2024_1", "MYSTERY SHOP", "");
        db.upsert_transactions(&[a.clone(), b.clone()]).unwrap();

        assert!(db.manual_merchant_categories().unwrap().is_empty());

        db.set_manual_category(&b.id, "lifestyle").unwrap();
        let overrides = db.manual_merchant_categories().unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["MYSTERY SHOP"], "lifestyle");
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let (_dir, db) = test_db();
        let original = txn("citi_feb_2024_3", "GRAB *TRIP", "transport");
        db.upsert_transactions(std::slice::from_ref(&original))
            .unwrap();

        let stored = db.list_transactions().unwrap();
        assert_eq!(stored[0].id, original.id);
        assert_eq!(stored[0].date, original.date);
        assert_eq!(stored[0].bank, Bank::Uob);
        assert_eq!(stored[0].direction, Direction::Debit);
        assert_eq!(stored[0].amount_cents, 660);
        assert_eq!(stored[0].merchant, "GRAB *TRIP");
    }

    #[test]
    fn test_count_uncategorized() {
        let (_dir, db) = test_db();
        db.upsert_transactions(&[
            txn("uob_dec_2024_0", "KNOWN", "food"),
            txn("uob_dec_2024_1", "UNKNOWN A", ""),
            txn("uob_dec_2024_2", "UNKNOWN B", ""),
        ])
        .unwrap();

        assert_eq!(db.count_uncategorized().unwrap(), 2);
    }
}
