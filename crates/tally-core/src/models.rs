//! Domain models for tally

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Supported banks for statement ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Uob,
    Citi,
}

impl Bank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uob => "UOB",
            Self::Citi => "CITI",
        }
    }
}

impl std::str::FromStr for Bank {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UOB" => Ok(Self::Uob),
            "CITI" | "CITIBANK" => Ok(Self::Citi),
            _ => Err(format!("Unknown bank: {}", s)),
        }
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction. Amounts are stored sign-free; the sign is
/// carried solely by this indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            _ => Err(format!("Unknown direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a transaction's category was assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    /// Assigned by the trie or the AI fallback
    #[default]
    Auto,
    /// Assigned by a human, authoritative over automated sources
    Manual,
}

impl CategorySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for CategorySource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown category source: {}", s)),
        }
    }
}

impl std::fmt::Display for CategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A statement row parsed into canonical shape, before categorization and
/// identity assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    /// Midnight of the transaction day in the reference timezone
    pub date: DateTime<FixedOffset>,
    pub direction: Direction,
    /// Non-negative amount in cents
    pub amount_cents: i64,
    /// Merchant description with reference-number suffixes stripped
    pub merchant: String,
}

/// A fully resolved canonical transaction, ready for upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Stable hash of `raw_location`, used for lookups
    pub id: String,
    pub date: DateTime<FixedOffset>,
    pub bank: Bank,
    pub direction: Direction,
    /// Non-negative amount in cents
    pub amount_cents: i64,
    /// Empty until resolution completes; stays empty when no source matched
    pub category: String,
    pub category_source: CategorySource,
    pub merchant: String,
    /// File stem + draft ordinal, the dedup key for idempotent re-ingestion
    pub raw_location: String,
}
