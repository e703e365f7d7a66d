// src/legacy/mod.rs
//! One-time migration of plaintext documents into the encrypted store
//!
//! Run once per deployment. Two concurrent runs against the same records can
//! race; nothing here locks.

mod migrate;

pub use migrate::{
    legacy_areas, FailureReason, LegacyArea, LegacyMigrator, LegacyRecord, MigrationFailure,
    MigrationOutcome, MigrationStage, MigrationSummary, ReferenceRepository,
};
