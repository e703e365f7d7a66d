// src/reference.rs
//! Opaque document references
//!
//! A reference is the only handle the record layer ever sees:
//! `{category}/{uuid-v4}.{extension}.encrypted`. Legacy plaintext references
//! are any other safe relative path.

use std::fmt;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::consts::ENCRYPTED_SUFFIX;
use crate::error::{RejectReason, Result};

/// Validated, storage-relative document path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobReference(String);

impl BlobReference {
    /// Accept a reference read from a record or a URL.
    ///
    /// Rejects anything that could escape the storage root.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty()
            || raw.starts_with('/')
            || raw.contains('\\')
            || raw.contains('\0')
            || raw.contains(':')
        {
            return Err(RejectReason::UnsafeSegment(raw.to_string()).into());
        }
        for segment in raw.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(RejectReason::UnsafeSegment(raw.to_string()).into());
            }
        }
        Ok(BlobReference(raw.to_string()))
    }

    /// Fresh ciphertext reference with an unguessable token
    pub fn generate(category: &str, extension: &str) -> Result<Self> {
        validate_category(category)?;
        let extension = normalize_extension(extension)?;
        let token = Uuid::new_v4();
        Ok(BlobReference(format!(
            "{category}/{token}.{extension}{ENCRYPTED_SUFFIX}"
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_encrypted(&self) -> bool {
        is_encrypted_reference(&self.0)
    }

    /// Extension the document had before encryption, lowercased
    pub fn original_extension(&self) -> Option<String> {
        let plain = self.0.strip_suffix(ENCRYPTED_SUFFIX).unwrap_or(&self.0);
        let file_name = plain.rsplit('/').next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Everything before the final path segment
    pub fn category(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| dir)
    }

    /// Location of this reference under `root`
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl fmt::Display for BlobReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BlobReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True iff `reference` carries the encrypted marker
pub fn is_encrypted_reference(reference: &str) -> bool {
    reference.ends_with(ENCRYPTED_SUFFIX)
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub(crate) fn validate_category(category: &str) -> Result<()> {
    if category.split('/').all(is_safe_segment) {
        Ok(())
    } else {
        Err(RejectReason::UnsafeSegment(category.to_string()).into())
    }
}

pub(crate) fn normalize_extension(extension: &str) -> Result<String> {
    let ext = extension.trim_start_matches('.');
    if !ext.is_empty() && ext.len() <= 10 && ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(ext.to_ascii_lowercase())
    } else {
        Err(RejectReason::UnsafeSegment(extension.to_string()).into())
    }
}
