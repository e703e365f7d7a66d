// src/consts.rs
//! Shared constants — security parameters and defaults

/// KDF iterations for the process document key.
// Input is already a uniformly random 256-bit key
pub const RANDOM_KEY_KDF_ITERATIONS: u32 = 1;

/// Suffix that marks a reference as AES-Crypt ciphertext
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Largest accepted decoded document (5 MiB)
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

/// Category (subdirectory) for patient identity documents
pub const DOCUMENT_CATEGORY: &str = "documents";

/// Extension recorded for inbound document photos
pub const DOCUMENT_EXTENSION: &str = "jpg";

/// Header magic for AES-Crypt v3 files
pub const AESCRYPT_V3_HEADER: &[u8; 5] = b"AES\x03\x00";

/// Prefix for base64-encoded keys in configuration
pub const BASE64_KEY_PREFIX: &str = "base64:";

/// Cache directive on decrypted document responses
pub const DOCUMENT_CACHE_CONTROL: &str = "private, max-age=3600";
