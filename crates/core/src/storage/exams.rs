//! Exam row operations.
//!
//! Same shape as [`super::patients`]: free functions over `&Connection`,
//! usable on plain connections and inside the intake transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{uuid_column, DbResult};
use crate::exam::{Exam, Modality};

const COLUMNS: &str =
    "id, patient_id, modality, exam_date, idempotency_key, created_at, updated_at";

/// Insert a new exam.
pub fn insert(conn: &Connection, exam: &Exam) -> DbResult<()> {
    conn.execute(
        "INSERT INTO exams (id, patient_id, modality, exam_date, idempotency_key, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            exam.id.to_string(),
            exam.patient_id.to_string(),
            exam.modality.as_str(),
            exam.exam_date,
            exam.idempotency_key,
            exam.created_at,
            exam.updated_at,
        ],
    )?;
    Ok(())
}

/// Look up an exam by idempotency key.
///
/// On a plain connection this is the unlocked fast-path read; inside an
/// IMMEDIATE transaction the same query is the race-closing re-check, since
/// the transaction already holds the database writer lock.
pub fn find_by_idempotency_key(conn: &Connection, key: &str) -> DbResult<Option<Exam>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM exams WHERE idempotency_key = ?1"),
        [key],
        exam_from_row,
    )
    .optional()
    .map_err(Into::into)
}

pub fn count(conn: &Connection) -> DbResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM exams", [], |row| row.get(0))
        .map_err(Into::into)
}

/// List exams ordered by creation time, newest first.
pub fn list(conn: &Connection, limit: u32, offset: u32) -> DbResult<Vec<Exam>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM exams ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, offset], exam_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn exam_from_row(row: &Row<'_>) -> rusqlite::Result<Exam> {
    let modality: String = row.get(2)?;
    let modality = modality.parse::<Modality>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Exam {
        id: uuid_column(row, 0)?,
        patient_id: uuid_column(row, 1)?,
        modality,
        exam_date: row.get(3)?,
        idempotency_key: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
