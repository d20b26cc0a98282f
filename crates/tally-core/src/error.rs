//! Error types for tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed amount: {0}")]
    MalformedAmount(String),

    #[error("Malformed date: {0}")]
    MalformedDate(String),

    /// Structural mismatch in a statement row, e.g. both the debit and the
    /// credit column of a deposit-account row populated. Fatal for the file.
    #[error("Unexpected row shape: {0}")]
    UnexpectedRowShape(String),

    #[error("Unsupported institution: {0}")]
    UnsupportedInstitution(String),

    #[error("Unrecognized statement file name: {0}")]
    BadStatementName(String),

    /// Curated category lists could not be read. The trie is required
    /// infrastructure, so this aborts the run.
    #[error("Category list source unavailable: {0}")]
    TrieSourceUnavailable(String),

    #[error("Classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
