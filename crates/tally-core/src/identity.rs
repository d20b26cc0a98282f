//! Stable identity derivation for transactions
//!
//! A transaction's locator is its file stem plus its ordinal position in the
//! parsed draft sequence of that file. Re-ingesting an unchanged file
//! reproduces the same locators, which is what makes ingestion idempotent
//! against a store that upserts on locator uniqueness.

use sha2::{Digest, Sha256};

/// Build the dedup key for a draft: `<file stem>_<draft ordinal>`.
///
/// The ordinal counts emitted drafts, not raw CSV rows, so skipped balance
/// and subtotal lines do not shift identities.
pub fn source_locator(file_stem: &str, draft_ordinal: usize) -> String {
    format!("{}_{}", file_stem, draft_ordinal)
}

/// Content-based transaction id: hex SHA-256 of the source locator
pub fn transaction_id(locator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(locator.as_bytes());
    hex::encode(hasher.finalize())
}
