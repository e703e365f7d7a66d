// src/db/patient_db_ops.rs
//! Patient table operations used by document storage and migration
//!
//! Registration, listing and pagination live in the record layer; this
//! module covers only what the document core reads and writes.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::legacy::{LegacyRecord, ReferenceRepository};
use crate::reference::BlobReference;

#[derive(Debug, Clone)]
pub struct NewPatient<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub phone_country_code: &'a str,
    pub phone_number: &'a str,
    pub document_photo_path: &'a str,
}

/// Insert a patient row; returns the generated id
pub fn insert_patient(conn: &Connection, patient: &NewPatient<'_>) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    conn.execute(
        r#"
        INSERT INTO patients (
            id, full_name, email, phone_country_code, phone_number, document_photo_path
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            &id,
            patient.full_name,
            patient.email,
            patient.phone_country_code,
            patient.phone_number,
            patient.document_photo_path,
        ],
    )?;
    Ok(id)
}

/// Stored document reference for a patient, if the patient exists
pub fn find_document_reference(conn: &Connection, patient_id: &str) -> Result<Option<String>> {
    let reference = conn
        .query_row(
            "SELECT document_photo_path FROM patients WHERE id = ?1",
            [patient_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(reference)
}

impl ReferenceRepository for Connection {
    fn legacy_records(&self) -> Result<Vec<LegacyRecord>> {
        let mut stmt = self.prepare(
            "SELECT id, document_photo_path FROM patients
             WHERE document_photo_path NOT GLOB '*.encrypted'
             ORDER BY created_at, id",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(LegacyRecord {
                    record_id: row.get(0)?,
                    reference: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn update_reference(&self, record_id: &str, reference: &BlobReference) -> Result<()> {
        let rows = self.execute(
            "UPDATE patients SET document_photo_path = ?1, updated_at = datetime('now')
             WHERE id = ?2",
            params![reference.as_str(), record_id],
        )?;
        if rows == 0 {
            return Err(CoreError::Sql(rusqlite::Error::QueryReturnedNoRows));
        }
        Ok(())
    }
}
