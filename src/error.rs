// src/error.rs
//! Public error type for the entire crate

use std::fmt;
use std::path::PathBuf;

use aescrypt_rs::AescryptError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(RejectReason),

    #[error("encryption failed: {0}")]
    EncryptionFailed(AescryptError),

    #[error("decryption failed: {0}")]
    DecryptionFailed(AescryptError),

    #[error("failed to write {}: {source}", path.display())]
    StorageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    StorageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<RejectReason> for CoreError {
    fn from(reason: RejectReason) -> Self {
        CoreError::InvalidInput(reason)
    }
}

/// Why an inbound document or path segment was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    EmptyDocument,
    InvalidBase64,
    NotJpeg,
    TooLarge { size: usize, max: usize },
    UnsafeSegment(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::EmptyDocument => f.write_str("the document is empty"),
            RejectReason::InvalidBase64 => f.write_str("the document is not valid base64"),
            RejectReason::NotJpeg => f.write_str("the document photo must be a valid JPG image"),
            RejectReason::TooLarge { size, max } => write!(
                f,
                "the document photo must not exceed {} MB ({size} bytes given)",
                max / (1024 * 1024)
            ),
            RejectReason::UnsafeSegment(segment) => {
                write!(f, "unsafe path segment {segment:?}")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
