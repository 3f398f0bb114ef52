//! # medreg core
//!
//! Core business logic for the medreg medical records service.
//!
//! This crate contains pure data operations over SQLite:
//! - Patient registration with document-uniqueness enforcement
//! - Idempotent exam intake (duplicate submissions sharing an idempotency
//!   key collapse into a single stored record, even under concurrency)
//! - Paginated listing for both entities
//!
//! **No API concerns**: HTTP servers, DTO validation, or wire formats belong
//! in `api-rest`.

pub mod error;
pub mod exam;
pub mod intake;
pub mod pagination;
pub mod patient;
pub mod registry;
pub mod storage;

pub use error::{DomainError, DomainResult};
pub use exam::{Exam, Modality, NewExam};
pub use intake::{CreatedExam, ExamIntake};
pub use pagination::{Page, PageRequest};
pub use patient::{NewPatient, Patient};
pub use registry::PatientRegistry;
pub use storage::{DbError, DbResult, Storage};
