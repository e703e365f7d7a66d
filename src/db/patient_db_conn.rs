// src/db/patient_db_conn.rs
use std::{fs, path::Path};

use rusqlite::{Connection, Result};

/// Open (or create) the patient database at `db_path`.
///
/// Only `document_photo_path` matters to this crate; the remaining columns
/// belong to the registration layer and are created here so both agree on
/// one schema.
pub fn open_patient_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let conn = Connection::open(db_path)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone_country_code TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            document_photo_path TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS patients_phone_unique
            ON patients(phone_country_code, phone_number);
        CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);
        "#,
    )?;

    Ok(conn)
}
