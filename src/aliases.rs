// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout patient-document-vault.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(DocumentKey32, 32); // 256-bit process-wide document key

// Dynamic secrets
dynamic_alias!(PlainText, Vec<u8>); // Legacy document bytes held during migration
