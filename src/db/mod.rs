// src/db/mod.rs
pub mod patient_db_conn;
pub mod patient_db_ops;

pub use patient_db_conn::open_patient_db;
pub use patient_db_ops::{find_document_reference, insert_patient, NewPatient};
