// tests/migration_tests.rs
//! Legacy plaintext migration against a real patient table

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use patient_document_vault::db::find_document_reference;
use patient_document_vault::legacy::{
    FailureReason, LegacyMigrator, LegacyRecord, MigrationStage, ReferenceRepository,
};
use patient_document_vault::{BlobReference, CoreError, CoreResult};

mod common;
mod support;
use support::{add_patient, tiny_jpeg, TestVault};

#[test]
fn migrates_only_legacy_records() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let original = tiny_jpeg();

    let old_path = vault.put_legacy(&vault.public_root(), "documents/legacy.jpg", &original);
    let legacy_id = add_patient(&conn, 1, "documents/legacy.jpg");

    let already = vault.store.encrypt_and_store(b"already safe", "documents", "jpg").unwrap();
    let encrypted_id = add_patient(&conn, 2, already.as_str());

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.outcomes[0].record_id, legacy_id);
    assert_eq!(summary.outcomes[0].old_reference, "documents/legacy.jpg");

    let new_ref = find_document_reference(&conn, &legacy_id).unwrap().unwrap();
    assert!(new_ref.ends_with(".jpg.encrypted"));
    assert!(!old_path.exists());

    let new_ref = BlobReference::parse(&new_ref).unwrap();
    assert_eq!(
        vault.store.decrypt_and_retrieve(&new_ref).unwrap().unwrap(),
        original
    );

    assert_eq!(
        find_document_reference(&conn, &encrypted_id).unwrap().as_deref(),
        Some(already.as_str())
    );
    assert_eq!(
        vault.store.decrypt_and_retrieve(&already).unwrap().unwrap(),
        b"already safe"
    );
}

#[test]
fn second_run_finds_nothing() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    vault.put_legacy(&vault.private_root(), "documents/once.jpg", &tiny_jpeg());
    add_patient(&conn, 1, "documents/once.jpg");

    let migrator = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas());
    assert_eq!(migrator.run().unwrap().succeeded(), 1);

    let again = migrator.run().unwrap();
    assert!(again.outcomes.is_empty());
}

#[test]
fn missing_file_leaves_record_untouched() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let id = add_patient(&conn, 1, "documents/gone.jpg");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.failed(), 1);
    let failure = summary.outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(failure.stage, MigrationStage::Pending);
    assert!(matches!(failure.reason, FailureReason::MissingLegacyFile));
    assert_eq!(
        find_document_reference(&conn, &id).unwrap().as_deref(),
        Some("documents/gone.jpg")
    );
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    add_patient(&conn, 1, "documents/gone.jpg");
    vault.put_legacy(&vault.private_root(), "documents/here.jpg", &tiny_jpeg());
    add_patient(&conn, 2, "documents/here.jpg");

    let mut seen = Vec::new();
    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run_with(|outcome| seen.push(outcome.old_reference.clone()))
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(seen.len(), 2);
}

#[test]
fn file_only_in_second_area_is_found() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let path = vault.put_legacy(&vault.private_root(), "documents/private-only.jpg", &tiny_jpeg());
    add_patient(&conn, 1, "documents/private-only.jpg");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(!path.exists());
}

#[test]
fn identical_copies_are_all_removed() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let bytes = tiny_jpeg();
    let public = vault.put_legacy(&vault.public_root(), "documents/twice.jpg", &bytes);
    let private = vault.put_legacy(&vault.private_root(), "documents/twice.jpg", &bytes);
    add_patient(&conn, 1, "documents/twice.jpg");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(!public.exists());
    assert!(!private.exists());
}

#[test]
fn differing_copies_are_refused() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let public = vault.put_legacy(&vault.public_root(), "documents/split.jpg", b"one version");
    let private = vault.put_legacy(&vault.private_root(), "documents/split.jpg", b"another");
    let id = add_patient(&conn, 1, "documents/split.jpg");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.failed(), 1);
    let failure = summary.outcomes[0].result.as_ref().unwrap_err();
    match &failure.reason {
        FailureReason::ConflictingLegacyCopies(areas) => assert_eq!(areas.len(), 2),
        other => panic!("expected conflicting copies, got {other:?}"),
    }
    assert!(public.exists());
    assert!(private.exists());
    assert_eq!(
        find_document_reference(&conn, &id).unwrap().as_deref(),
        Some("documents/split.jpg")
    );
}

#[test]
fn unsafe_reference_is_never_read() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    vault.put_legacy(vault.dir.path(), "outside.jpg", b"not in any area");
    add_patient(&conn, 1, "../outside.jpg");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    let failure = summary.outcomes[0].result.as_ref().unwrap_err();
    assert!(matches!(failure.reason, FailureReason::UnsafeReference));
    assert!(vault.dir.path().join("outside.jpg").exists());
}

#[test]
fn original_extension_is_preserved() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    vault.put_legacy(&vault.public_root(), "uploads/scan.PNG", b"png-ish bytes");
    let id = add_patient(&conn, 1, "uploads/scan.PNG");

    LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    let new_ref = find_document_reference(&conn, &id).unwrap().unwrap();
    assert!(new_ref.starts_with("documents/"));
    assert!(new_ref.ends_with(".png.encrypted"));
}

/// Repository whose writes always fail, to exercise the rollback path
struct ReadOnlyRecords {
    records: Vec<LegacyRecord>,
    attempted: RefCell<Vec<BlobReference>>,
}

impl ReferenceRepository for ReadOnlyRecords {
    fn legacy_records(&self) -> CoreResult<Vec<LegacyRecord>> {
        Ok(self.records.clone())
    }

    fn update_reference(&self, _record_id: &str, reference: &BlobReference) -> CoreResult<()> {
        self.attempted.borrow_mut().push(reference.clone());
        Err(CoreError::Sql(rusqlite::Error::QueryReturnedNoRows))
    }
}

#[test]
fn failed_update_removes_the_new_blob() {
    common::setup();
    let vault = TestVault::new();
    let old = vault.put_legacy(&vault.public_root(), "documents/keep.jpg", &tiny_jpeg());
    let repo = ReadOnlyRecords {
        records: vec![LegacyRecord {
            record_id: "p-1".into(),
            reference: "documents/keep.jpg".into(),
        }],
        attempted: RefCell::new(Vec::new()),
    };

    let summary = LegacyMigrator::new(&vault.store, &repo, vault.legacy_areas())
        .run()
        .unwrap();

    let failure = summary.outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(failure.stage, MigrationStage::Stored);
    let attempted = repo.attempted.borrow();
    assert_eq!(attempted.len(), 1);
    assert!(!vault.store.exists(&attempted[0]));
    assert!(old.exists());
}

#[test]
fn marker_match_is_case_sensitive() {
    common::setup();
    let vault = TestVault::new();
    let conn = vault.open_db();
    let old = vault.put_legacy(&vault.public_root(), "documents/scan.ENCRYPTED", &tiny_jpeg());
    let id = add_patient(&conn, 1, "documents/scan.ENCRYPTED");

    let summary = LegacyMigrator::new(&vault.store, &conn, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.succeeded(), 1);
    assert!(!old.exists());
    let new_ref = find_document_reference(&conn, &id).unwrap().unwrap();
    assert!(new_ref.ends_with(".encrypted"));
    assert_ne!(new_ref, "documents/scan.ENCRYPTED");
}

/// Repository that accepts the update, then leaves something at the old
/// path that cannot be unlinked as a file
struct BlockedCleanup {
    records: Vec<LegacyRecord>,
    legacy_path: PathBuf,
    updated: RefCell<Option<BlobReference>>,
}

impl ReferenceRepository for BlockedCleanup {
    fn legacy_records(&self) -> CoreResult<Vec<LegacyRecord>> {
        Ok(self.records.clone())
    }

    fn update_reference(&self, _record_id: &str, reference: &BlobReference) -> CoreResult<()> {
        fs::remove_file(&self.legacy_path).unwrap();
        fs::create_dir_all(self.legacy_path.join("occupied")).unwrap();
        *self.updated.borrow_mut() = Some(reference.clone());
        Ok(())
    }
}

#[test]
fn leftover_plaintext_is_reported_after_the_update() {
    common::setup();
    let vault = TestVault::new();
    let legacy_path = vault.put_legacy(&vault.public_root(), "documents/stuck.jpg", &tiny_jpeg());
    let repo = BlockedCleanup {
        records: vec![LegacyRecord {
            record_id: "p-1".into(),
            reference: "documents/stuck.jpg".into(),
        }],
        legacy_path: legacy_path.clone(),
        updated: RefCell::new(None),
    };

    let summary = LegacyMigrator::new(&vault.store, &repo, vault.legacy_areas())
        .run()
        .unwrap();

    assert_eq!(summary.failed(), 1);
    let failure = summary.outcomes[0].result.as_ref().unwrap_err();
    assert_eq!(failure.stage, MigrationStage::ReferenceUpdated);
    assert!(matches!(failure.reason, FailureReason::OldCopyNotRemoved(_)));

    let updated = repo.updated.borrow().clone().unwrap();
    assert!(updated.is_encrypted());
    assert!(vault.store.exists(&updated));
    assert_eq!(
        vault.store.decrypt_and_retrieve(&updated).unwrap().unwrap(),
        tiny_jpeg()
    );
    assert!(legacy_path.is_dir());
}
