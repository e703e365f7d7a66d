// src/core/store.rs
//! Encrypted blob store — the only code that touches the private storage area
//!
//! Plaintext never reaches the disk: bytes are encrypted in memory first and
//! only the AES-Crypt ciphertext is written.

use std::path::{Path, PathBuf};

use aescrypt_rs::aliases::Password;
use tracing::{debug, warn};

use crate::aliases::DocumentKey32;
use crate::config::Config;
use crate::core::crypto::{decrypt_to_vec, document_password, encrypt_to_vec};
use crate::core::file::{read_if_exists, remove_if_exists, write_atomic};
use crate::error::{RejectReason, Result};
use crate::reference::{self, BlobReference};

pub struct EncryptedBlobStore {
    root: PathBuf,
    password: Password,
}

impl EncryptedBlobStore {
    pub fn new(root: impl Into<PathBuf>, key: &DocumentKey32) -> Self {
        Self {
            root: root.into(),
            password: document_password(key),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config.document_key()?;
        Ok(Self::new(config.paths.storage_root.clone(), &key))
    }

    /// Root of the private storage area
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Encrypt `plaintext` and store it under a fresh random reference.
    ///
    /// Not idempotent: every call produces a new reference, even for
    /// identical bytes.
    pub fn encrypt_and_store(
        &self,
        plaintext: &[u8],
        category: &str,
        extension: &str,
    ) -> Result<BlobReference> {
        if plaintext.is_empty() {
            return Err(RejectReason::EmptyDocument.into());
        }
        let reference = BlobReference::generate(category, extension)?;
        let ciphertext = encrypt_to_vec(plaintext, &self.password)?;

        let path = reference.resolve(&self.root);
        write_atomic(&path, &ciphertext)?;

        debug!(
            "stored {reference} ({} bytes, encrypted {} bytes)",
            plaintext.len(),
            ciphertext.len()
        );
        Ok(reference)
    }

    /// Decrypt the blob behind `reference`.
    ///
    /// `Ok(None)` means nothing is stored there; a blob that exists but fails
    /// authentication is `Err(DecryptionFailed)`.
    pub fn decrypt_and_retrieve(&self, reference: &BlobReference) -> Result<Option<Vec<u8>>> {
        let path = reference.resolve(&self.root);
        let Some(ciphertext) = read_if_exists(&path)? else {
            debug!("no blob at {reference}");
            return Ok(None);
        };
        let plaintext = decrypt_to_vec(&ciphertext, &self.password)?;
        Ok(Some(plaintext))
    }

    /// Remove a stored blob. Returns `true` when the blob is gone afterwards,
    /// including when there was nothing to delete.
    pub fn delete_blob(&self, reference: &BlobReference) -> bool {
        let path = reference.resolve(&self.root);
        match remove_if_exists(&path) {
            Ok(_) => true,
            Err(e) => {
                warn!("failed to delete {reference}: {e}");
                false
            }
        }
    }

    pub fn exists(&self, reference: &BlobReference) -> bool {
        reference.resolve(&self.root).is_file()
    }

    pub fn is_encrypted_reference(reference: &str) -> bool {
        reference::is_encrypted_reference(reference)
    }
}
