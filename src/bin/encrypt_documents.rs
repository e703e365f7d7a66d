// src/bin/encrypt_documents.rs
//! Encrypt existing plaintext patient documents — run once per deployment

use anyhow::{Context, Result};
use patient_document_vault::db::open_patient_db;
use patient_document_vault::legacy::legacy_areas;
use patient_document_vault::{Config, EncryptedBlobStore, LegacyMigrator};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load().context("Failed to load configuration")?;
    let store = EncryptedBlobStore::from_config(&config)
        .context("Failed to initialise document store (is PDV_DOCUMENT_KEY set?)")?;
    let conn = open_patient_db(&config.paths.patient_db)
        .with_context(|| format!("Failed to open {}", config.paths.patient_db.display()))?;

    info!("Starting document encryption process...");
    let areas = legacy_areas(&config);
    let migrator = LegacyMigrator::new(&store, &conn, areas);

    let summary = migrator
        .run_with(|outcome| match &outcome.result {
            Ok(new_ref) => println!(
                "✓ Encrypted document for patient {} → {new_ref}",
                outcome.record_id
            ),
            Err(failure) => println!(
                "✗ Failed for patient {} ({}): {}",
                outcome.record_id, outcome.old_reference, failure.reason
            ),
        })
        .context("Failed to list unencrypted documents")?;

    if summary.outcomes.is_empty() {
        println!("No unencrypted documents found.");
        return Ok(());
    }

    println!("\n=== ENCRYPTION COMPLETE ===");
    println!("Success: {} | Failed: {}", summary.succeeded(), summary.failed());

    Ok(())
}
