// src/core/file.rs
//! File-level helpers for the private storage area
//!
//! Writes go through a temp file in the destination directory, are fsynced,
//! then renamed into place, so a reader never observes a half-written blob.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Atomically write `bytes` to `path`, creating parent directories
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_failed = |source: io::Error| CoreError::StorageWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().ok_or_else(|| {
        write_failed(io::Error::new(
            io::ErrorKind::InvalidInput,
            "blob path has no parent directory",
        ))
    })?;
    fs::create_dir_all(parent).map_err(write_failed)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    #[cfg(unix)]
    {
        if let Err(e) = fs::File::open(parent).and_then(|dir| dir.sync_all()) {
            debug!("directory fsync skipped for {}: {e}", parent.display());
        }
    }

    Ok(())
}

/// Read a file, mapping "not found" to `None`
pub fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CoreError::StorageReadFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Remove a file; `Ok(false)` when nothing was there
pub fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
