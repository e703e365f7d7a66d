// tests/support.rs
//! Test utilities — isolated storage areas, patient DB and synthetic images

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use patient_document_vault::db::{insert_patient, open_patient_db, NewPatient};
use patient_document_vault::legacy::LegacyArea;
use patient_document_vault::{BlobReference, DocumentKey32, EncryptedBlobStore};
use rusqlite::Connection;
use tempfile::TempDir;

#[allow(dead_code)]
pub struct TestVault {
    pub dir: TempDir,
    pub store: Arc<EncryptedBlobStore>,
}

#[allow(dead_code)]
impl TestVault {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = EncryptedBlobStore::new(dir.path().join("private"), &test_key());
        Self {
            dir,
            store: Arc::new(store),
        }
    }

    pub fn private_root(&self) -> PathBuf {
        self.dir.path().join("private")
    }

    pub fn public_root(&self) -> PathBuf {
        self.dir.path().join("public")
    }

    /// Public area first, then the private root, as deployed
    pub fn legacy_areas(&self) -> Vec<LegacyArea> {
        vec![
            LegacyArea {
                name: "public".into(),
                root: self.public_root(),
            },
            LegacyArea {
                name: "private".into(),
                root: self.private_root(),
            },
        ]
    }

    pub fn blob_path(&self, reference: &BlobReference) -> PathBuf {
        reference.resolve(self.store.root())
    }

    pub fn open_db(&self) -> Connection {
        open_patient_db(&self.dir.path().join("patients.db")).expect("open patient db")
    }

    /// Drop a plaintext file into a legacy area
    pub fn put_legacy(&self, root: &Path, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = relative
            .split('/')
            .fold(root.to_path_buf(), |p, s| p.join(s));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, bytes).unwrap();
        path
    }
}

#[allow(dead_code)]
pub fn test_key() -> DocumentKey32 {
    DocumentKey32::new([0x42; 32])
}

#[allow(dead_code)]
pub fn other_key() -> DocumentKey32 {
    DocumentKey32::new([0x17; 32])
}

#[allow(dead_code)]
pub fn add_patient(conn: &Connection, n: u32, document_photo_path: &str) -> String {
    insert_patient(
        conn,
        &NewPatient {
            full_name: &format!("Patient Number {n}"),
            email: &format!("patient{n}@gmail.com"),
            phone_country_code: "+598",
            phone_number: &format!("{:08}", 90_000_000 + n),
            document_photo_path,
        },
    )
    .expect("insert patient")
}

/// Structurally valid baseline JPEG of exactly `total_len` bytes
#[allow(dead_code)]
pub fn jpeg_of_len(total_len: usize) -> Vec<u8> {
    let mut v = vec![0xFF, 0xD8];
    v.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    v.extend_from_slice(b"JFIF\0");
    v.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    v.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x10]);
    v.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    assert!(total_len >= v.len() + 2, "jpeg_of_len: {total_len} too small");
    v.resize(total_len - 2, 0x00);
    v.extend_from_slice(&[0xFF, 0xD9]);
    v
}

#[allow(dead_code)]
pub fn tiny_jpeg() -> Vec<u8> {
    jpeg_of_len(64)
}

#[allow(dead_code)]
pub fn png_bytes() -> Vec<u8> {
    let mut v = b"\x89PNG\r\n\x1a\n".to_vec();
    v.extend_from_slice(&[0x00, 0x00, 0x00, 0x0D]);
    v.extend_from_slice(b"IHDR");
    v.extend_from_slice(&[
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00,
    ]);
    v.extend_from_slice(&[0x90, 0x77, 0x53, 0xDE]);
    v
}
