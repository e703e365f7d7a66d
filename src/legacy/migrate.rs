// src/legacy/migrate.rs
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::aliases::PlainText;
use crate::config::Config;
use crate::consts::{DOCUMENT_CATEGORY, DOCUMENT_EXTENSION};
use crate::core::file::{read_if_exists, remove_if_exists};
use crate::core::EncryptedBlobStore;
use crate::error::{CoreError, Result};
use crate::reference::{normalize_extension, BlobReference};

/// A record whose stored reference lacks the encrypted marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    pub record_id: String,
    pub reference: String,
}

/// Where document references live. Implemented for the patient table.
pub trait ReferenceRepository {
    fn legacy_records(&self) -> Result<Vec<LegacyRecord>>;
    fn update_reference(&self, record_id: &str, reference: &BlobReference) -> Result<()>;
}

/// A directory that may still hold plaintext documents
#[derive(Debug, Clone)]
pub struct LegacyArea {
    pub name: String,
    pub root: PathBuf,
}

/// Legacy areas from configuration, in priority order
pub fn legacy_areas(config: &Config) -> Vec<LegacyArea> {
    config
        .paths
        .legacy_roots
        .iter()
        .map(|root| LegacyArea {
            name: root.display().to_string(),
            root: root.clone(),
        })
        .collect()
}

/// Last step a record reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStage {
    Pending,
    Loaded,
    Stored,
    ReferenceUpdated,
    Done,
}

#[derive(Debug)]
pub enum FailureReason {
    UnsafeReference,
    MissingLegacyFile,
    /// Same path in several areas with different contents
    ConflictingLegacyCopies(Vec<String>),
    /// Record points at the new blob but a plaintext copy is still on disk
    OldCopyNotRemoved(String),
    Core(CoreError),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UnsafeReference => f.write_str("reference is not a safe relative path"),
            FailureReason::MissingLegacyFile => f.write_str("file not found in any legacy area"),
            FailureReason::ConflictingLegacyCopies(areas) => {
                write!(f, "differing copies in {}", areas.join(", "))
            }
            FailureReason::OldCopyNotRemoved(detail) => {
                write!(f, "plaintext copy not removed: {detail}")
            }
            FailureReason::Core(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
pub struct MigrationFailure {
    pub stage: MigrationStage,
    pub reason: FailureReason,
}

impl MigrationFailure {
    fn at(stage: MigrationStage, reason: FailureReason) -> Self {
        Self { stage, reason }
    }
}

#[derive(Debug)]
pub struct MigrationOutcome {
    pub record_id: String,
    pub old_reference: String,
    pub result: std::result::Result<BlobReference, MigrationFailure>,
}

#[derive(Debug, Default)]
pub struct MigrationSummary {
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

pub struct LegacyMigrator<'a, R: ReferenceRepository> {
    store: &'a EncryptedBlobStore,
    records: &'a R,
    areas: Vec<LegacyArea>,
}

impl<'a, R: ReferenceRepository> LegacyMigrator<'a, R> {
    pub fn new(store: &'a EncryptedBlobStore, records: &'a R, areas: Vec<LegacyArea>) -> Self {
        Self {
            store,
            records,
            areas,
        }
    }

    pub fn run(&self) -> Result<MigrationSummary> {
        self.run_with(|_| {})
    }

    /// Migrate every legacy record, reporting each outcome as it happens.
    ///
    /// Only discovery failure aborts the batch; per-record failures are
    /// collected in the summary.
    pub fn run_with(
        &self,
        mut on_outcome: impl FnMut(&MigrationOutcome),
    ) -> Result<MigrationSummary> {
        let records = self.records.legacy_records()?;
        info!("found {} unencrypted document(s)", records.len());

        let mut summary = MigrationSummary::default();
        for record in records {
            // Repositories may over-select; the marker check decides
            if EncryptedBlobStore::is_encrypted_reference(&record.reference) {
                continue;
            }
            let result = self.migrate_one(&record);
            match &result {
                Ok(new_ref) => info!("record {} migrated to {new_ref}", record.record_id),
                Err(failure) => warn!(
                    "record {} failed at {:?}: {}",
                    record.record_id, failure.stage, failure.reason
                ),
            }
            let outcome = MigrationOutcome {
                record_id: record.record_id,
                old_reference: record.reference,
                result,
            };
            on_outcome(&outcome);
            summary.outcomes.push(outcome);
        }
        Ok(summary)
    }

    fn migrate_one(
        &self,
        record: &LegacyRecord,
    ) -> std::result::Result<BlobReference, MigrationFailure> {
        use MigrationStage::*;

        let old = BlobReference::parse(&record.reference)
            .map_err(|_| MigrationFailure::at(Pending, FailureReason::UnsafeReference))?;

        let (plaintext, found_in) = self.load(&old)?;
        debug!("{old} loaded from {} area(s)", found_in.len());

        let extension = old
            .original_extension()
            .and_then(|ext| normalize_extension(&ext).ok())
            .unwrap_or_else(|| DOCUMENT_EXTENSION.to_string());
        let new_ref = self
            .store
            .encrypt_and_store(plaintext.expose_secret(), DOCUMENT_CATEGORY, &extension)
            .map_err(|e| MigrationFailure::at(Loaded, FailureReason::Core(e)))?;

        if let Err(e) = self.records.update_reference(&record.record_id, &new_ref) {
            // The record still points at the plaintext; drop the orphan
            self.store.delete_blob(&new_ref);
            return Err(MigrationFailure::at(Stored, FailureReason::Core(e)));
        }

        for area in &found_in {
            let path = old.resolve(&area.root);
            if let Err(e) = remove_if_exists(&path) {
                return Err(MigrationFailure::at(
                    ReferenceUpdated,
                    FailureReason::OldCopyNotRemoved(format!("{}: {e}", area.name)),
                ));
            }
        }
        debug!("{old} reached {:?}", Done);
        Ok(new_ref)
    }

    /// Read the plaintext from every area that has it.
    ///
    /// Identical copies are fine; differing copies are refused rather than
    /// silently preferring the first area.
    fn load(
        &self,
        old: &BlobReference,
    ) -> std::result::Result<(PlainText, Vec<&LegacyArea>), MigrationFailure> {
        use MigrationStage::Pending;

        let mut first: Option<PlainText> = None;
        let mut found_in = Vec::new();
        let mut conflicting = false;

        for area in &self.areas {
            let bytes = read_if_exists(&old.resolve(&area.root))
                .map_err(|e| MigrationFailure::at(Pending, FailureReason::Core(e)))?;
            let Some(bytes) = bytes else { continue };
            let copy = PlainText::new(bytes);
            match &first {
                None => first = Some(copy),
                Some(existing) => {
                    if existing.expose_secret() != copy.expose_secret() {
                        conflicting = true;
                    }
                }
            }
            found_in.push(area);
        }

        if conflicting {
            let names = found_in.iter().map(|a| a.name.clone()).collect();
            return Err(MigrationFailure::at(
                Pending,
                FailureReason::ConflictingLegacyCopies(names),
            ));
        }
        match first {
            Some(plaintext) => Ok((plaintext, found_in)),
            None => Err(MigrationFailure::at(
                Pending,
                FailureReason::MissingLegacyFile,
            )),
        }
    }
}
