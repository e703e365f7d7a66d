// src/document/mod.rs
//! Inbound document intake
//!
//! Turns the base64 photo submitted by the record layer into validated JPEG
//! bytes and hands them to the blob store.

pub mod jpeg;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::consts::{DOCUMENT_CATEGORY, DOCUMENT_EXTENSION};
use crate::core::EncryptedBlobStore;
use crate::error::{RejectReason, Result};
use crate::reference::BlobReference;

pub use jpeg::{sniff_jpeg, JpegInfo};

/// Strip a leading `data:image/<type>;base64,` header if present
pub fn strip_data_uri(input: &str) -> &str {
    let Some(rest) = input.strip_prefix("data:image/") else {
        return input;
    };
    let subtype_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if subtype_len == 0 {
        return input;
    }
    rest[subtype_len..]
        .strip_prefix(";base64,")
        .unwrap_or(input)
}

/// Decode and validate a submitted document photo.
///
/// Accepts at most `max_bytes` of decoded data and only real JPEGs.
pub fn decode_document(input: &str, max_bytes: usize) -> Result<Vec<u8>> {
    let payload: String = strip_data_uri(input.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(RejectReason::EmptyDocument.into());
    }

    // Refuse to decode something that cannot fit before allocating for it
    let lower_bound = (payload.len() / 4 * 3).saturating_sub(2);
    if lower_bound > max_bytes {
        return Err(RejectReason::TooLarge {
            size: lower_bound,
            max: max_bytes,
        }
        .into());
    }

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|_| RejectReason::InvalidBase64)?;
    if bytes.is_empty() {
        return Err(RejectReason::EmptyDocument.into());
    }
    if bytes.len() > max_bytes {
        return Err(RejectReason::TooLarge {
            size: bytes.len(),
            max: max_bytes,
        }
        .into());
    }

    let info = sniff_jpeg(&bytes).ok_or(RejectReason::NotJpeg)?;
    debug!(
        "accepted {}x{} JPEG ({} bytes)",
        info.width,
        info.height,
        bytes.len()
    );
    Ok(bytes)
}

/// Validate a submitted photo and store it encrypted; returns the reference
/// the record layer persists.
pub fn store_document_photo(
    store: &EncryptedBlobStore,
    input: &str,
    max_bytes: usize,
) -> Result<BlobReference> {
    let bytes = decode_document(input, max_bytes)?;
    store.encrypt_and_store(&bytes, DOCUMENT_CATEGORY, DOCUMENT_EXTENSION)
}
