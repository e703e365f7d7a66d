// src/config/app.rs
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::aliases::DocumentKey32;
use crate::consts::{BASE64_KEY_PREFIX, MAX_DOCUMENT_BYTES};
use crate::error::{CoreError, Result};

/// Process configuration, built once at startup and handed to constructors
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_keys")]
    pub keys: Keys,
    #[serde(default = "default_paths")]
    pub paths: Paths,
    #[serde(default = "default_features")]
    pub features: Features,
    #[serde(default = "default_server")]
    pub server: Server,
    #[serde(default = "default_limits")]
    pub limits: Limits,
}

#[derive(Clone, Default, Deserialize)]
pub struct Keys {
    pub document_key: Option<String>,
}

// Never print key material
impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("document_key", &self.document_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paths {
    /// Private area holding ciphertext blobs
    pub storage_root: PathBuf,
    pub patient_db: PathBuf,
    /// Areas searched for plaintext documents, highest priority first
    #[serde(default)]
    pub legacy_roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Features {
    pub use_dev_keys: bool,
}

#[derive(Clone, Deserialize)]
pub struct Server {
    pub bind: String,
    pub access_token: Option<String>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("bind", &self.bind)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Limits {
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,
}

fn default_max_document_bytes() -> usize {
    MAX_DOCUMENT_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: default_keys(),
            paths: default_paths(),
            features: default_features(),
            server: default_server(),
            limits: default_limits(),
        }
    }
}

impl Config {
    /// Load from `PDV_CONFIG` (or `pdv-config.toml`), then apply env overrides.
    ///
    /// A missing file falls back to the built-in development defaults.
    pub fn load() -> Result<Config> {
        let config_path =
            std::env::var("PDV_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut conf = if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                CoreError::Config(format!("failed to read {config_path}: {e}"))
            })?;
            Config::from_toml_str(&content)?
        } else {
            warn!("{config_path} not found, using built-in defaults");
            Config::default()
        };

        conf.apply_env_overrides();
        Ok(conf)
    }

    pub fn from_toml_str(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| CoreError::Config(format!("invalid TOML: {e}")))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PDV_DOCUMENT_KEY") {
            self.keys.document_key = Some(key);
        }
        if let Ok(root) = std::env::var("PDV_STORAGE_ROOT") {
            self.paths.storage_root = root.into();
        }
        if let Ok(db) = std::env::var("PDV_PATIENT_DB") {
            self.paths.patient_db = db.into();
        }
        if let Ok(bind) = std::env::var("PDV_BIND") {
            self.server.bind = bind;
        }
    }

    /// Resolve the process document key.
    ///
    /// Falls back to the development key only when `use_dev_keys` is on.
    pub fn document_key(&self) -> Result<DocumentKey32> {
        match (&self.keys.document_key, self.features.use_dev_keys) {
            (Some(encoded), _) => parse_document_key(encoded),
            (None, true) => {
                warn!("no document key configured, using the development key");
                parse_document_key(DEFAULT_DEV_DOCUMENT_KEY)
            }
            (None, false) => Err(CoreError::Config(
                "document key required: set PDV_DOCUMENT_KEY or keys.document_key".into(),
            )),
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| CoreError::Config(format!("invalid bind address {}: {e}", self.server.bind)))
    }
}

/// Parse a 256-bit key given as 64 hex characters or `base64:<standard base64>`
pub fn parse_document_key(encoded: &str) -> Result<DocumentKey32> {
    let encoded = encoded.trim();
    let bytes = match encoded.strip_prefix(BASE64_KEY_PREFIX) {
        Some(b64) => STANDARD
            .decode(b64)
            .map_err(|_| CoreError::Config("document key is not valid base64".into()))?,
        None => hex::decode(encoded)
            .map_err(|_| CoreError::Config("document key is not valid hex".into()))?,
    };
    let raw: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
        CoreError::Config(format!("document key must be 32 bytes, got {}", b.len()))
    })?;
    Ok(DocumentKey32::new(raw))
}
