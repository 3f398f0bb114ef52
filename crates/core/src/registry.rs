//! Patient registry service.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, PageRequest};
use crate::patient::{NewPatient, Patient};
use crate::storage::{patients, Storage};

/// Owns patient records and the document-uniqueness guarantee.
///
/// Registration is check-then-insert: a read-by-document pre-check converts
/// the common duplicate into a `Conflict` before touching the table, and a
/// racing insert that slips past the pre-check hits the storage-level unique
/// index, which is folded into the same `Conflict`. The intake's lock-based
/// protocol is deliberately not used here: a document number identifies an
/// entity, not a creation intent, so two submissions with one document are
/// conflicting requests rather than retries of a single one.
pub struct PatientRegistry {
    storage: Arc<Storage>,
}

impl PatientRegistry {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Register a new patient, failing with `Conflict` if the document
    /// number is already taken.
    pub fn create(&self, input: NewPatient) -> DomainResult<Patient> {
        let conn = self.storage.connect()?;

        if patients::find_by_document(&conn, &input.document)?.is_some() {
            return Err(DomainError::Conflict {
                entity: "patient",
                field: "document",
                value: input.document,
            });
        }

        let patient = Patient::new(input);
        match patients::insert(&conn, &patient) {
            Ok(()) => {
                tracing::info!(id = %patient.id, "patient registered");
                Ok(patient)
            }
            Err(e) if e.is_unique_violation("patients.document") => Err(DomainError::Conflict {
                entity: "patient",
                field: "document",
                value: patient.document,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a patient with this id exists. Reflects committed state at
    /// call time; no side effects.
    pub fn exists_by_id(&self, id: Uuid) -> DomainResult<bool> {
        let conn = self.storage.connect()?;
        Ok(patients::exists_by_id(&conn, id)?)
    }

    /// List patients, newest first.
    pub fn list(&self, request: PageRequest) -> DomainResult<Page<Patient>> {
        let conn = self.storage.connect()?;
        let total = patients::count(&conn)?;
        let data = patients::list(&conn, request.limit(), request.offset())?;
        Ok(Page::new(data, total, &request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registry() -> PatientRegistry {
        PatientRegistry::new(Arc::new(Storage::open_in_memory().unwrap()))
    }

    fn input(document: &str) -> NewPatient {
        NewPatient {
            name: "Ana Costa".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 6, 1).unwrap(),
            document: document.into(),
        }
    }

    #[test]
    fn test_create_and_exists() {
        let registry = registry();
        let patient = registry.create(input("12345678900")).unwrap();
        assert!(registry.exists_by_id(patient.id).unwrap());
        assert!(!registry.exists_by_id(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn test_duplicate_document_is_conflict() {
        let registry = registry();
        registry.create(input("12345678900")).unwrap();

        let err = registry.create(input("12345678900")).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Conflict {
                entity: "patient",
                field: "document",
                ..
            }
        ));

        // The losing create inserted nothing.
        let page = registry.list(PageRequest::default()).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_list_pagination() {
        let registry = registry();
        for i in 0..5 {
            registry.create(input(&format!("1111111110{i}"))).unwrap();
        }

        let page = registry
            .list(PageRequest::new(Some(1), Some(2)).unwrap())
            .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);

        let last = registry
            .list(PageRequest::new(Some(3), Some(2)).unwrap())
            .unwrap();
        assert_eq!(last.data.len(), 1);
    }
}
