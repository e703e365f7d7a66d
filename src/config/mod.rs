// src/config/mod.rs
//! Configuration system for patient-document-vault
//!
//! TOML file + env overrides, loaded once by the binary and passed down.

pub use app::{parse_document_key, Config, Features, Keys, Limits, Paths, Server};

mod app;
mod defaults;
