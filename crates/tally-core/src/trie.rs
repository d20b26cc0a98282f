//! Prefix trie over curated merchant names
//!
//! Merchant strings from statements carry per-branch suffixes (location
//! codes, outlet numbers) that curated lists cannot enumerate. A single
//! curated entry like `KOI THE` therefore has to match `KOI THE - NEX` and
//! friends, which is exactly longest-inserted-prefix matching.
//!
//! Keys are uppercased with all whitespace removed, so matching is case- and
//! whitespace-insensitive. The trie is built once per run and read-only
//! afterwards.

use std::collections::HashMap;

/// One trie node. Each node exclusively owns its children; the structure is
/// a tree, never a DAG.
#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    /// Set on the node where an inserted merchant string ends
    category: Option<String>,
}

/// Merchant-prefix to category lookup structure
#[derive(Debug, Default)]
pub struct CategoryTrie {
    root: TrieNode,
    len: usize,
}

/// Uppercase and drop all whitespace, the canonical trie key form
fn normalize_key(merchant: &str) -> String {
    merchant
        .split_whitespace()
        .collect::<String>()
        .to_uppercase()
}

impl CategoryTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of inserted merchant entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a merchant -> category mapping.
    ///
    /// Entries that are prefixes of each other coexist; lookup resolves the
    /// ambiguity by preferring the longest inserted prefix.
    pub fn insert(&mut self, merchant: &str, category: &str) {
        let key = normalize_key(merchant);
        if key.is_empty() {
            return;
        }

        let mut curr = &mut self.root;
        for ch in key.chars() {
            curr = curr.children.entry(ch).or_default();
        }
        curr.category = Some(category.to_string());
        self.len += 1;
    }

    /// Return the category of the longest inserted merchant string that is a
    /// prefix of `merchant`, or `None` when no inserted prefix matches.
    pub fn match_longest_category(&self, merchant: &str) -> Option<&str> {
        let key = normalize_key(merchant);

        let mut curr = &self.root;
        let mut best = curr.category.as_deref();

        for ch in key.chars() {
            match curr.children.get(&ch) {
                Some(child) => curr = child,
                None => return best,
            }
            if let Some(cat) = curr.category.as_deref() {
                best = Some(cat);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_with_suffix_noise() {
        let mut trie = CategoryTrie::new();
        trie.insert("KOI THE", "drinks");

        assert_eq!(trie.match_longest_category("KOI THE - NEX"), Some("drinks"));
        assert_eq!(trie.match_longest_category("koi the #03-21"), Some("drinks"));
    }

    #[test]
    fn test_longest_inserted_prefix_wins() {
        let mut trie = CategoryTrie::new();
        trie.insert("GRAB", "transport");
        trie.insert("GRABFOOD", "food");

        assert_eq!(trie.match_longest_category("GRAB *TRIP 123"), Some("transport"));
        assert_eq!(trie.match_longest_category("GRABFOOD SG"), Some("food"));
        // insertion order does not matter
        let mut trie = CategoryTrie::new();
        trie.insert("GRABFOOD", "food");
        trie.insert("GRAB", "transport");
        assert_eq!(trie.match_longest_category("GRAB *TRIP 123"), Some("transport"));
    }

    #[test]
    fn test_partial_walk_falls_back_to_shorter_prefix() {
        // diverging mid-way through a longer entry still returns the best
        // category seen along the path
        let mut trie = CategoryTrie::new();
        trie.insert("NTUC", "groceries");
        trie.insert("NTUC INCOME", "insurance");

        assert_eq!(trie.match_longest_category("NTUC FP-XTRA"), Some("groceries"));
        assert_eq!(
            trie.match_longest_category("NTUC INCOME PREMIUM"),
            Some("insurance")
        );
    }

    #[test]
    fn test_no_match() {
        let mut trie = CategoryTrie::new();
        trie.insert("STARBUCKS", "drinks");

        assert_eq!(trie.match_longest_category("UNKNOWN SHOP"), None);
        assert_eq!(trie.match_longest_category(""), None);
    }

    #[test]
    fn test_whitespace_and_case_insensitive() {
        let mut trie = CategoryTrie::new();
        trie.insert("Cold Storage", "groceries");

        assert_eq!(
            trie.match_longest_category("COLDSTORAGE GREAT WORLD"),
            Some("groceries")
        );
    }

    #[test]
    fn test_query_shorter_than_entry() {
        let mut trie = CategoryTrie::new();
        trie.insert("STARBUCKS COFFEE", "drinks");

        // input exhausted before any inserted entry completes
        assert_eq!(trie.match_longest_category("STARB"), None);
    }
}
