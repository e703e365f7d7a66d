// src/config/defaults.rs
use crate::config::app::{Features, Keys, Limits, Paths, Server};
use crate::consts::MAX_DOCUMENT_BYTES;

pub const DEFAULT_CONFIG_FILE: &str = "pdv-config.toml";

/// Development-only key. Never use outside local testing
pub const DEFAULT_DEV_DOCUMENT_KEY: &str =
    "6465762d646f63756d656e742d6b65792d323032362d6e6f742d736563726574";

pub fn default_keys() -> Keys {
    Keys { document_key: None }
}

pub fn default_paths() -> Paths {
    Paths {
        storage_root: "storage/private".into(),
        patient_db: "storage/patients.db".into(),
        legacy_roots: vec!["storage/public".into(), "storage/private".into()],
    }
}

pub fn default_features() -> Features {
    Features { use_dev_keys: true }
}

pub fn default_server() -> Server {
    Server {
        bind: "127.0.0.1:8080".into(),
        access_token: None,
    }
}

pub fn default_limits() -> Limits {
    Limits {
        max_document_bytes: MAX_DOCUMENT_BYTES,
    }
}
