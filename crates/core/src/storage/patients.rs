//! Patient row operations.
//!
//! Free functions over `&Connection` so they run both on plain connections
//! and inside transactions. Mapping between SQL rows and the domain
//! [`Patient`] happens here only; the domain type carries no storage
//! annotations.

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{uuid_column, DbResult};
use crate::patient::Patient;

const COLUMNS: &str = "id, name, birth_date, document, created_at, updated_at";

/// Insert a new patient.
pub fn insert(conn: &Connection, patient: &Patient) -> DbResult<()> {
    conn.execute(
        "INSERT INTO patients (id, name, birth_date, document, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            patient.id.to_string(),
            patient.name,
            patient.birth_date,
            patient.document,
            patient.created_at,
            patient.updated_at,
        ],
    )?;
    Ok(())
}

/// Look up a patient by document number.
pub fn find_by_document(conn: &Connection, document: &str) -> DbResult<Option<Patient>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM patients WHERE document = ?1"),
        [document],
        patient_from_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Whether a patient with this id exists in committed state.
pub fn exists_by_id(conn: &Connection, id: Uuid) -> DbResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?1)",
        [id.to_string()],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

pub fn count(conn: &Connection) -> DbResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
        .map_err(Into::into)
}

/// List patients ordered by creation time, newest first.
pub fn list(conn: &Connection, limit: u32, offset: u32) -> DbResult<Vec<Patient>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM patients ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, offset], patient_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        birth_date: row.get(2)?,
        document: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
