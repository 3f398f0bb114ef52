use crate::storage::DbError;

/// Domain-level error taxonomy.
///
/// Only `Transient` is retryable by the caller; the other variants are
/// deterministic and must not be retried as-is. Note that an exam-create
/// hitting an already-known idempotency key is NOT an error — it is a
/// successful outcome with `is_new = false`.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{entity} with identifier '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} with {field} '{value}' already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("storage failure: {0}")]
    Transient(#[from] DbError),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
