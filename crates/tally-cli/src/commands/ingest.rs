//! Ingest command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tally_core::{ingest_directory, Classifier, ClassifierClient};

use super::open_db;

pub async fn cmd_ingest(
    db_path: &Path,
    statement_dir: &Path,
    categories_dir: &Path,
    no_ai: bool,
) -> Result<()> {
    let db = open_db(db_path)?;

    let classifier = if no_ai {
        None
    } else {
        let client = ClassifierClient::from_env();
        if client.is_none() {
            println!("ℹ️  OLLAMA_HOST not set, skipping AI classification");
        }
        client
    };

    if let Some(ref client) = classifier {
        println!(
            "🤖 AI classification via {} ({})",
            client.host(),
            client.model()
        );
    }

    println!("📥 Ingesting statements from {}...", statement_dir.display());

    let report = ingest_directory(
        statement_dir,
        categories_dir,
        &db,
        classifier.as_ref().map(|c| c as &dyn Classifier),
    )
    .await
    .with_context(|| format!("Ingestion failed for {}", statement_dir.display()))?;

    println!("✅ Ingest complete!");
    println!("   Files: {}", report.files);
    println!("   Parsed: {}", report.parsed);
    println!("   Inserted: {}", report.upsert.inserted);
    println!("   Skipped (already stored): {}", report.upsert.skipped);
    if report.overrides_applied > 0 {
        println!("   Manual overrides applied: {}", report.overrides_applied);
    }
    if report.ai_submitted > 0 {
        if report.ai_failed {
            println!(
                "   AI classification failed for {} merchants (left uncategorized)",
                report.ai_submitted
            );
        } else {
            println!(
                "   AI classified: {} transactions ({} merchants)",
                report.ai_applied, report.ai_submitted
            );
        }
    }

    if !report.unaccounted.is_empty() {
        println!(
            "⚠️  {} merchants left without a category:",
            report.unaccounted.len()
        );
        for merchant in &report.unaccounted {
            println!("   - {}", merchant);
        }
    }

    Ok(())
}
