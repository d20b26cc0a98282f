//! Batch ingestion orchestrator
//!
//! One run: build the trie, load manual overrides, parse every statement
//! file in the input directory, resolve categories in precedence order,
//! assign identities, upsert. Files are processed one at a time and rows in
//! order, so locators are deterministic and a re-run over unchanged files is
//! a no-op against the store.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ai::Classifier;
use crate::categories;
use crate::categorize::{unresolved_merchants, AiPassOutcome, Resolver};
use crate::db::{Database, UpsertStats};
use crate::error::Result;
use crate::identity;
use crate::models::{CategorySource, Draft, Transaction};
use crate::statement::{detect_statement_source, parse_statement, StatementSource};

/// What one ingestion run did, for operator visibility
#[derive(Debug, Default)]
pub struct IngestReport {
    pub files: usize,
    pub parsed: usize,
    pub overrides_applied: usize,
    pub ai_submitted: usize,
    pub ai_applied: usize,
    pub ai_failed: bool,
    pub upsert: UpsertStats,
    /// Distinct merchants no resolution source could categorize. These are
    /// persisted with an empty category, not dropped, so the operator can
    /// extend the curated lists or review them by hand.
    pub unaccounted: Vec<String>,
}

/// Parse one statement file into identity-bearing transactions, applying the
/// parse-time trie pass.
pub fn parse_statement_file(path: &Path, resolver: &Resolver) -> Result<Vec<Transaction>> {
    let source = detect_statement_source(path)?;
    let file = File::open(path)?;
    let drafts = parse_statement(file, &source)?;

    let mut txns = Vec::with_capacity(drafts.len());
    for (ordinal, draft) in drafts.into_iter().enumerate() {
        txns.push(to_transaction(draft, &source, ordinal, resolver));
    }
    Ok(txns)
}

fn to_transaction(
    draft: Draft,
    source: &StatementSource,
    ordinal: usize,
    resolver: &Resolver,
) -> Transaction {
    let category = resolver
        .trie_category(&draft.merchant)
        .unwrap_or_default()
        .to_string();
    let raw_location = identity::source_locator(&source.file_stem, ordinal);
    let id = identity::transaction_id(&raw_location);

    Transaction {
        id,
        date: draft.date,
        bank: source.bank,
        direction: draft.direction,
        amount_cents: draft.amount_cents,
        category,
        category_source: CategorySource::Auto,
        merchant: draft.merchant,
        raw_location,
    }
}

/// Statement files in a directory, sorted by name for deterministic order
fn statement_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Run a full ingestion pass over a directory of statement files.
///
/// The trie is required (unreadable curated lists abort the run); manual
/// overrides and the AI classifier are optional enhancements that degrade
/// gracefully. Parser errors surface to the caller: they indicate a format
/// mismatch that needs investigation, not data to skip.
pub async fn ingest_directory(
    statement_dir: &Path,
    categories_dir: &Path,
    db: &Database,
    classifier: Option<&dyn Classifier>,
) -> Result<IngestReport> {
    let trie = categories::build_trie(categories_dir)?;

    let overrides = match db.manual_merchant_categories() {
        Ok(overrides) => overrides,
        Err(e) => {
            warn!("could not read manual overrides: {} (continuing without)", e);
            Default::default()
        }
    };
    let resolver = Resolver::new(trie, overrides);

    let mut report = IngestReport::default();
    let mut all_txns: Vec<Transaction> = Vec::new();

    for path in statement_files(statement_dir)? {
        info!(file = %path.display(), "reading statement file");
        let txns = parse_statement_file(&path, &resolver)?;
        report.files += 1;
        all_txns.extend(txns);
    }
    report.parsed = all_txns.len();

    report.overrides_applied = resolver.apply_overrides(&mut all_txns);

    if let Some(classifier) = classifier {
        let AiPassOutcome {
            applied,
            submitted,
            failed,
        } = resolver.apply_ai_fallback(&mut all_txns, classifier).await;
        report.ai_applied = applied;
        report.ai_submitted = submitted;
        report.ai_failed = failed;
    }

    report.unaccounted = unresolved_merchants(&all_txns);
    if !report.unaccounted.is_empty() {
        warn!(
            merchants = report.unaccounted.len(),
            "merchants left without a category"
        );
    }

    report.upsert = db.upsert_transactions(&all_txns)?;
    info!(
        total = report.upsert.total,
        inserted = report.upsert.inserted,
        skipped = report.upsert.skipped,
        "upsert complete"
    );

    Ok(report)
}
