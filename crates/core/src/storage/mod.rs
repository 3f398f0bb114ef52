//! SQLite storage layer for medreg.
//!
//! `Storage` owns the database location and hands out one connection per
//! operation; every cross-request exclusion is delegated to SQLite's own
//! write locking (IMMEDIATE transactions plus a busy timeout), so the core
//! carries no in-memory coordination primitive.
//!
//! Entity operations live in [`patients`] and [`exams`] as free functions
//! over `&Connection`, so the same helpers run on plain connections and
//! inside transactions.

mod schema;

pub mod exams;
pub mod patients;

pub use schema::SCHEMA;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Row};
use thiserror::Error;
use uuid::Uuid;

/// How long a blocked writer waits for the database lock before the
/// operation surfaces as a transient failure.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// True when this error is a unique-constraint violation on the given
    /// `table.column` index.
    pub fn is_unique_violation(&self, column: &str) -> bool {
        match self {
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, Some(msg))) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains(column)
            }
            _ => false,
        }
    }
}

enum Location {
    File(PathBuf),
    /// Named shared-cache in-memory database (tests/dev). The URI carries a
    /// random name so independent `Storage` instances do not collide.
    Memory(String),
}

/// Handle to the medreg database.
///
/// Cheap to share behind an `Arc`; every operation opens its own connection
/// via [`Storage::connect`].
pub struct Storage {
    location: Location,
    // Keeps an in-memory database alive across per-operation connections.
    _keeper: Option<Mutex<Connection>>,
}

impl Storage {
    /// Open (creating if needed) a file-backed database and initialise the
    /// schema.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let storage = Self {
            location: Location::File(path.as_ref().to_path_buf()),
            _keeper: None,
        };
        let conn = storage.connect()?;
        conn.execute_batch(SCHEMA)?;
        Ok(storage)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:medreg-{}?mode=memory&cache=shared",
            Uuid::new_v4().simple()
        );
        let mut storage = Self {
            location: Location::Memory(uri),
            _keeper: None,
        };
        let keeper = storage.connect()?;
        keeper.execute_batch(SCHEMA)?;
        storage._keeper = Some(Mutex::new(keeper));
        Ok(storage)
    }

    /// Open a fresh connection with the per-connection pragmas applied.
    pub fn connect(&self) -> DbResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => Connection::open(path)?,
            Location::Memory(uri) => Connection::open_with_flags(
                uri,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )?,
        };
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        if let Location::File(_) = self.location {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        }
        Ok(conn)
    }
}

/// Read a TEXT column as a `Uuid`.
pub(crate) fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(idx)?;
    Uuid::parse_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_connections_share_one_database() {
        let storage = Storage::open_in_memory().unwrap();
        let a = storage.connect().unwrap();
        a.execute(
            "INSERT INTO patients (id, name, birth_date, document, created_at, updated_at)
             VALUES ('p1', 'Ana', '1990-01-01', '11111111111', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let b = storage.connect().unwrap();
        let count: i64 = b
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_open_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path().join("medreg.db")).unwrap();
        let conn = storage.connect().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn test_unique_violation_classification() {
        let storage = Storage::open_in_memory().unwrap();
        let conn = storage.connect().unwrap();
        let insert = "INSERT INTO patients (id, name, birth_date, document, created_at, updated_at)
                      VALUES (?1, 'Ana', '1990-01-01', '22222222222', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')";
        conn.execute(insert, ["p1"]).unwrap();
        let err = DbError::from(conn.execute(insert, ["p2"]).unwrap_err());
        assert!(err.is_unique_violation("patients.document"));
        assert!(!err.is_unique_violation("exams.idempotency_key"));
    }
}
