// src/core/mod.rs
pub mod crypto;
pub mod file;
pub mod store;

pub use crypto::*;
pub use store::EncryptedBlobStore;
