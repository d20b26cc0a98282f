//! Tally Core Library
//!
//! Shared functionality for the tally statement ingestion tool:
//! - Statement parsers for supported bank export formats
//! - Amount and date normalization into canonical shape
//! - Merchant-prefix category trie built from curated lists
//! - Layered category resolution (manual overrides, trie, batched AI)
//! - Stable identity derivation for idempotent re-ingestion
//! - SQLite persistence honoring the locator-keyed upsert contract

pub mod ai;
pub mod amount;
pub mod categories;
pub mod categorize;
pub mod date;
pub mod db;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod models;
pub mod statement;
pub mod trie;

pub use ai::{Classifier, ClassifierClient, MockClassifier, OllamaClassifier};
pub use categorize::{AiPassOutcome, Resolver};
pub use db::{Database, UpsertStats};
pub use error::{Error, Result};
pub use ingest::{ingest_directory, IngestReport};
pub use models::{Bank, CategorySource, Direction, Draft, Transaction};
pub use trie::CategoryTrie;
