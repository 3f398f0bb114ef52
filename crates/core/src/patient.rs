//! Patient domain records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered patient.
///
/// The `document` (national document number) is unique across all patients;
/// the unique index lives at the storage layer and the service re-checks it
/// before insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub document: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for patient registration.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub birth_date: NaiveDate,
    pub document: String,
}

impl Patient {
    /// Construct a patient with a fresh id and creation timestamps.
    pub fn new(input: NewPatient) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            birth_date: input.birth_date,
            document: input.document,
            created_at: now,
            updated_at: now,
        }
    }
}
