// src/core/crypto.rs
//! Pure cryptographic primitives — no I/O, no database
//!
//! AES-Crypt v3 on in-memory buffers. The format carries a random session
//! key and IV per call and an HMAC-SHA256 over the ciphertext, so two
//! encryptions of the same bytes never match and tampering fails on decrypt.

use std::io::Cursor;

use aescrypt_rs::aliases::Password;
use aescrypt_rs::{decrypt, encrypt};

use crate::aliases::DocumentKey32;
use crate::consts::{AESCRYPT_V3_HEADER, RANDOM_KEY_KDF_ITERATIONS};
use crate::error::{CoreError, Result};

/// AES-Crypt password for the process document key (hex of the raw key)
pub fn document_password(key: &DocumentKey32) -> Password {
    Password::new(hex::encode(key.expose_secret()))
}

/// Encrypt plaintext in memory → returns AES-Crypt v3 ciphertext
pub fn encrypt_to_vec(plaintext: &[u8], password: &Password) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encrypt(
        Cursor::new(plaintext),
        &mut out,
        password,
        RANDOM_KEY_KDF_ITERATIONS,
    )
    .map_err(CoreError::EncryptionFailed)?;
    Ok(out)
}

/// Decrypt ciphertext in memory → returns plaintext
///
/// Partial output is dropped on failure; callers only ever see verified bytes.
pub fn decrypt_to_vec(ciphertext: &[u8], password: &Password) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decrypt(Cursor::new(ciphertext), &mut out, password).map_err(CoreError::DecryptionFailed)?;
    Ok(out)
}

/// Check if data starts with an AES-Crypt v3 header
pub fn is_aescrypt_v3(data: &[u8]) -> bool {
    data.starts_with(AESCRYPT_V3_HEADER)
}
