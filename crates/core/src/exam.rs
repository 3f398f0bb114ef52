//! Diagnostic exam domain records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// DICOM modality code for the imaging technique used in an exam.
///
/// Closed enumeration; anything outside this set is rejected at the
/// validation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Cr,
    Ct,
    Dx,
    Mg,
    Mr,
    Nm,
    Ot,
    Pt,
    Rf,
    Us,
    Xa,
}

impl Modality {
    pub const ALL: [Modality; 11] = [
        Modality::Cr,
        Modality::Ct,
        Modality::Dx,
        Modality::Mg,
        Modality::Mr,
        Modality::Nm,
        Modality::Ot,
        Modality::Pt,
        Modality::Rf,
        Modality::Us,
        Modality::Xa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Cr => "CR",
            Modality::Ct => "CT",
            Modality::Dx => "DX",
            Modality::Mg => "MG",
            Modality::Mr => "MR",
            Modality::Nm => "NM",
            Modality::Ot => "OT",
            Modality::Pt => "PT",
            Modality::Rf => "RF",
            Modality::Us => "US",
            Modality::Xa => "XA",
        }
    }

    /// Comma-separated list of every accepted code, for error messages.
    pub fn codes() -> String {
        Self::ALL
            .iter()
            .map(Modality::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown modality '{0}'")]
pub struct UnknownModality(pub String);

impl FromStr for Modality {
    type Err = UnknownModality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownModality(s.to_string()))
    }
}

/// A stored diagnostic exam.
///
/// `idempotency_key` is unique across all exams; the uniqueness holds even
/// under concurrent creation attempts (see [`crate::intake::ExamIntake`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub modality: Modality,
    pub exam_date: NaiveDate,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for exam creation.
#[derive(Debug, Clone)]
pub struct NewExam {
    pub patient_id: Uuid,
    pub modality: Modality,
    pub exam_date: NaiveDate,
    pub idempotency_key: String,
}

impl Exam {
    /// Construct an exam with a fresh id and creation timestamps.
    pub fn new(input: NewExam) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            patient_id: input.patient_id,
            modality: input.modality,
            exam_date: input.exam_date,
            idempotency_key: input.idempotency_key,
            created_at: now,
            updated_at: now,
        }
    }
}
