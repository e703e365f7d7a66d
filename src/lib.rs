// src/lib.rs
//! patient-document-vault — encrypted storage for patient identity documents
//!
//! Features:
//! - AES Crypt v3 encryption at rest under a process-wide key
//! - Unguessable UUID v4 references, never content-derived
//! - JPEG intake validation with a 5 MiB cap
//! - Retrieval gateway with allow-listed content types and nosniff headers
//! - One-time migration of legacy plaintext documents

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod db;
pub mod document;
pub mod error;
pub mod gateway;
pub mod http;
pub mod legacy;
pub mod reference;

// Re-export everything users need at the crate root
pub use aliases::{DocumentKey32, PlainText};
pub use config::Config;
pub use core::EncryptedBlobStore;
pub use document::{decode_document, store_document_photo};
pub use error::{CoreError, RejectReason, Result as CoreResult};
pub use gateway::{content_type_for, DocumentResponse, RetrievalGateway};
pub use legacy::{LegacyArea, LegacyMigrator, MigrationSummary};
pub use reference::{is_encrypted_reference, BlobReference};
