// src/gateway.rs
//! Read-side boundary for stored documents
//!
//! Turns an opaque reference into bytes plus a content type chosen from a
//! fixed allow-list. Callers get `Found`, `NotFound` or `Failed`; the HTTP
//! layer decides how much of a failure to reveal (nothing).

use std::sync::Arc;

use tracing::{error, warn};

use crate::core::EncryptedBlobStore;
use crate::error::CoreError;
use crate::reference::BlobReference;

#[derive(Debug)]
pub enum DocumentResponse {
    Found {
        bytes: Vec<u8>,
        content_type: &'static str,
    },
    NotFound,
    Failed(CoreError),
}

pub struct RetrievalGateway {
    store: Arc<EncryptedBlobStore>,
}

impl RetrievalGateway {
    pub fn new(store: Arc<EncryptedBlobStore>) -> Self {
        Self { store }
    }

    /// Resolve and decrypt `raw_reference`.
    ///
    /// References that are malformed or lack the encrypted marker are
    /// reported as `NotFound` without touching storage.
    pub fn show(&self, raw_reference: &str) -> DocumentResponse {
        let reference = match BlobReference::parse(raw_reference) {
            Ok(r) => r,
            Err(e) => {
                warn!("rejected document reference: {e}");
                return DocumentResponse::NotFound;
            }
        };
        if !reference.is_encrypted() {
            warn!("refused to serve unencrypted reference {reference}");
            return DocumentResponse::NotFound;
        }

        match self.store.decrypt_and_retrieve(&reference) {
            Ok(Some(bytes)) => DocumentResponse::Found {
                bytes,
                content_type: content_type_for(&reference),
            },
            Ok(None) => DocumentResponse::NotFound,
            Err(e) => {
                error!("failed to retrieve {reference}: {e}");
                DocumentResponse::Failed(e)
            }
        }
    }
}

/// Content type from the pre-encryption extension embedded in the reference
pub fn content_type_for(reference: &BlobReference) -> &'static str {
    match reference.original_extension().as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
