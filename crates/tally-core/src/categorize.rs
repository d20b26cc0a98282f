//! Category resolution pipeline
//!
//! Three sources of category truth, applied in strict precedence order:
//!
//! 1. manual overrides (exact merchant match, from prior user edits)
//! 2. the trie built from curated lists (longest-prefix match, at parse time)
//! 3. a batched AI pass over whatever is still unresolved
//!
//! Each stage only touches records the stronger stages left unresolved,
//! except manual overrides, which replace trie results outright. Overrides
//! and AI are optional enhancements and degrade gracefully; the trie is
//! required infrastructure.
//!
//! All run state is explicit and owned by the caller. Nothing here keeps
//! ambient accumulators, so the pipeline is re-entrant and testable in
//! isolation.

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::ai::Classifier;
use crate::models::{CategorySource, Transaction};
use crate::trie::CategoryTrie;

/// Outcome of the AI fallback stage
#[derive(Debug, Default)]
pub struct AiPassOutcome {
    /// Transactions that received a category from the AI response
    pub applied: usize,
    /// Distinct merchants submitted
    pub submitted: usize,
    /// Whether the batched call failed entirely (non-fatal)
    pub failed: bool,
}

/// The run-scoped resolver: trie plus manual overrides, both read-only after
/// construction.
pub struct Resolver {
    trie: CategoryTrie,
    overrides: HashMap<String, String>,
}

impl Resolver {
    pub fn new(trie: CategoryTrie, overrides: HashMap<String, String>) -> Self {
        Self { trie, overrides }
    }

    /// Parse-time pass: longest-prefix trie lookup for one merchant.
    pub fn trie_category(&self, merchant: &str) -> Option<&str> {
        self.trie.match_longest_category(merchant)
    }

    /// Override pass: exact-match manual overrides win over whatever the trie
    /// produced. Returns the number of transactions overridden.
    pub fn apply_overrides(&self, txns: &mut [Transaction]) -> usize {
        if self.overrides.is_empty() {
            return 0;
        }

        let mut applied = 0;
        for txn in txns.iter_mut() {
            if let Some(category) = self.overrides.get(&txn.merchant) {
                txn.category = category.clone();
                txn.category_source = CategorySource::Manual;
                applied += 1;
            }
        }
        if applied > 0 {
            info!(applied, "applied manual merchant overrides");
        }
        applied
    }

    /// AI fallback pass over every transaction still without a category.
    ///
    /// Submits the distinct unresolved merchants as one batched request and
    /// applies the response to all transactions sharing a merchant. A failed
    /// call leaves those merchants uncategorized and the run continues.
    pub async fn apply_ai_fallback(
        &self,
        txns: &mut [Transaction],
        classifier: &dyn Classifier,
    ) -> AiPassOutcome {
        let merchants = unresolved_merchants(txns);
        if merchants.is_empty() {
            return AiPassOutcome::default();
        }

        info!(merchants = merchants.len(), "categorising merchants with AI");

        let categories = match classifier.classify_merchants(&merchants).await {
            Ok(map) => map,
            Err(e) => {
                warn!("AI categorisation failed: {} (continuing without)", e);
                return AiPassOutcome {
                    submitted: merchants.len(),
                    failed: true,
                    ..Default::default()
                };
            }
        };

        let mut applied = 0;
        for txn in txns.iter_mut() {
            if txn.category.is_empty() {
                if let Some(category) = categories.get(&txn.merchant) {
                    txn.category = category.clone();
                    txn.category_source = CategorySource::Auto;
                    applied += 1;
                }
            }
        }

        AiPassOutcome {
            applied,
            submitted: merchants.len(),
            failed: false,
        }
    }
}

/// Distinct merchants of transactions still carrying an empty category, in
/// deterministic order.
pub fn unresolved_merchants(txns: &[Transaction]) -> Vec<String> {
    let set: BTreeSet<&str> = txns
        .iter()
        .filter(|t| t.category.is_empty())
        .map(|t| t.merchant.as_str())
        .collect();
    set.into_iter().map(String::from).collect()
}
