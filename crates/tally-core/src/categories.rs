//! Curated category lists and the closed category label set
//!
//! Curated lists live in a directory with one plain-text file per category.
//! The file stem (case-preserved) is the category label; each non-blank line
//! names one merchant belonging to that category.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::trie::CategoryTrie;

/// The closed set of category labels. AI responses are validated against this
/// set; anything else is coerced to [`DEFAULT_CATEGORY`].
pub const ALLOWED_CATEGORIES: [&str; 12] = [
    "food",
    "drinks",
    "travel",
    "transport",
    "groceries",
    "lifestyle",
    "subscriptions",
    "education",
    "investment",
    "insurance",
    "transfers",
    "misc",
];

/// Catch-all label for anything that does not clearly fit
pub const DEFAULT_CATEGORY: &str = "misc";

/// Whether a label belongs to the closed category set
pub fn is_allowed_category(label: &str) -> bool {
    ALLOWED_CATEGORIES.contains(&label)
}

/// Build the category trie from a directory of curated merchant lists.
///
/// The trie is required infrastructure for categorization: an unreadable
/// directory is `TrieSourceUnavailable` and aborts the run. Individual blank
/// lines are skipped.
pub fn build_trie(dir: &Path) -> Result<CategoryTrie> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::TrieSourceUnavailable(format!("{}: {}", dir.display(), e))
    })?;

    let mut trie = CategoryTrie::new();

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::TrieSourceUnavailable(format!("{}: {}", dir.display(), e))
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let category = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_string(),
            None => continue,
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            Error::TrieSourceUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let mut count = 0;
        for line in contents.lines() {
            let merchant = line.trim();
            if merchant.is_empty() {
                continue;
            }
            trie.insert(merchant, &category);
            count += 1;
        }
        debug!(category = %category, merchants = count, "loaded curated list");
    }

    info!(entries = trie.len(), "built category trie from curated lists");
    Ok(trie)
}
