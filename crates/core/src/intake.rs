//! Idempotent exam intake.
//!
//! The intake guarantees that any number of concurrent `create` calls
//! sharing one idempotency key collapse into a single stored exam: exactly
//! one call inserts, and every call returns the same record. Exclusion is
//! delegated entirely to SQLite's write locking; the service itself holds
//! no mutex.

use std::sync::Arc;

use rusqlite::TransactionBehavior;

use crate::error::{DomainError, DomainResult};
use crate::exam::{Exam, NewExam};
use crate::pagination::{Page, PageRequest};
use crate::registry::PatientRegistry;
use crate::storage::{exams, DbError, Storage};

/// Outcome of [`ExamIntake::create`]: the stored exam plus whether this call
/// was the one that inserted it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedExam {
    pub exam: Exam,
    pub is_new: bool,
}

/// Creates exam records referencing a patient.
///
/// Collaborators arrive via the constructor: the storage handle and the
/// patient registry used for the existence precondition.
pub struct ExamIntake {
    storage: Arc<Storage>,
    registry: Arc<PatientRegistry>,
}

impl ExamIntake {
    pub fn new(storage: Arc<Storage>, registry: Arc<PatientRegistry>) -> Self {
        Self { storage, registry }
    }

    /// Create an exam, collapsing duplicate submissions by idempotency key.
    ///
    /// Two-phase, optimistic-then-pessimistic:
    ///
    /// 1. Unlocked read by key. A hit returns immediately with
    ///    `is_new = false`, without opening a transaction — the common
    ///    "duplicate retry" case never contends for the writer lock.
    /// 2. Patient existence precondition, outside any transaction; an
    ///    unknown patient is `NotFound` and nothing is written.
    /// 3. IMMEDIATE transaction. Taking the writer lock up front closes the
    ///    race window left by step 1: the key is re-queried under the lock,
    ///    and only if still absent is the exam inserted. A concurrent call
    ///    that lost the race observes the winner's committed row here and
    ///    returns it with `is_new = false`.
    ///
    /// Storage failures in either phase (including writer-lock timeout)
    /// surface as [`DomainError::Transient`].
    pub fn create(&self, input: NewExam) -> DomainResult<CreatedExam> {
        let mut conn = self.storage.connect()?;

        if let Some(existing) = exams::find_by_idempotency_key(&conn, &input.idempotency_key)? {
            tracing::debug!(key = %input.idempotency_key, "idempotency key hit on fast path");
            return Ok(CreatedExam {
                exam: existing,
                is_new: false,
            });
        }

        if !self.registry.exists_by_id(input.patient_id)? {
            return Err(DomainError::NotFound {
                entity: "patient",
                id: input.patient_id.to_string(),
            });
        }

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;

        if let Some(existing) = exams::find_by_idempotency_key(&tx, &input.idempotency_key)? {
            // A concurrent request won the race between the unlocked read
            // and the lock acquisition. Nothing to commit.
            tracing::debug!(key = %input.idempotency_key, "idempotency key hit under writer lock");
            return Ok(CreatedExam {
                exam: existing,
                is_new: false,
            });
        }

        let exam = Exam::new(input);
        exams::insert(&tx, &exam)?;
        tx.commit().map_err(DbError::from)?;

        tracing::info!(id = %exam.id, key = %exam.idempotency_key, "exam created");
        Ok(CreatedExam { exam, is_new: true })
    }

    /// List exams, newest first.
    pub fn list(&self, request: PageRequest) -> DomainResult<Page<Exam>> {
        let conn = self.storage.connect()?;
        let total = exams::count(&conn)?;
        let data = exams::list(&conn, request.limit(), request.offset())?;
        Ok(Page::new(data, total, &request))
    }
}
