//! Request/response DTOs for the REST surface.
//!
//! Wire field names are camelCase. Each request DTO has an explicit
//! `validate()` that runs before any domain logic and returns either the
//! typed domain input or the full list of field violations; request fields
//! are `Option` so missing values reach the validator and come back as a
//! 400 message list rather than a serde rejection.

use chrono::NaiveDate;
use medreg_core::{Exam, Modality, NewExam, NewPatient, Page, Patient};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// ISO date, YYYY-MM-DD.
    #[serde(default)]
    pub birth_date: Option<String>,
    /// National document number, unique across patients.
    #[serde(default)]
    pub document: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, Vec<String>> {
        let mut errors = Vec::new();

        let name = required_text(self.name, "name", &mut errors).and_then(|name| {
            if (2..=255).contains(&name.chars().count()) {
                Some(name)
            } else {
                errors.push("name must be between 2 and 255 characters".into());
                None
            }
        });

        let birth_date = parse_date(self.birth_date, "birthDate", &mut errors);

        let document = required_text(self.document, "document", &mut errors).and_then(|doc| {
            if (5..=20).contains(&doc.chars().count()) {
                Some(doc)
            } else {
                errors.push("document must be between 5 and 20 characters".into());
                None
            }
        });

        match (name, birth_date, document) {
            (Some(name), Some(birth_date), Some(document)) => Ok(NewPatient {
                name,
                birth_date,
                document,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamRequest {
    /// Id of an already-registered patient.
    #[serde(default)]
    pub patient_id: Option<String>,
    /// DICOM modality code (CR, CT, DX, MG, MR, NM, OT, PT, RF, US, XA).
    #[serde(default)]
    pub modality: Option<String>,
    /// ISO date, YYYY-MM-DD.
    #[serde(default)]
    pub exam_date: Option<String>,
    /// Caller-supplied token identifying this creation intent; repeated
    /// submissions with the same key return the original record.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl CreateExamRequest {
    pub fn validate(self) -> Result<NewExam, Vec<String>> {
        let mut errors = Vec::new();

        let patient_id =
            required_text(self.patient_id, "patientId", &mut errors).and_then(|raw| {
                match Uuid::parse_str(&raw) {
                    Ok(id) => Some(id),
                    Err(_) => {
                        errors.push("patientId must be a valid UUID".into());
                        None
                    }
                }
            });

        let modality = required_text(self.modality, "modality", &mut errors).and_then(|raw| {
            match raw.parse::<Modality>() {
                Ok(modality) => Some(modality),
                Err(_) => {
                    errors.push(format!("modality must be one of: {}", Modality::codes()));
                    None
                }
            }
        });

        let exam_date = parse_date(self.exam_date, "examDate", &mut errors);

        let idempotency_key = match self.idempotency_key {
            Some(key) if !key.is_empty() => {
                if key.chars().count() <= 255 {
                    Some(key)
                } else {
                    errors.push("idempotencyKey must be between 1 and 255 characters".into());
                    None
                }
            }
            _ => {
                errors.push("idempotencyKey is required".into());
                None
            }
        };

        match (patient_id, modality, exam_date, idempotency_key) {
            (Some(patient_id), Some(modality), Some(exam_date), Some(idempotency_key)) => {
                Ok(NewExam {
                    patient_id,
                    modality,
                    exam_date,
                    idempotency_key,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Pagination query parameters, shared by both list endpoints.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    pub page: Option<u32>,
    /// Items per page, 1-100 (default 10).
    pub page_size: Option<u32>,
}

fn required_text(
    value: Option<String>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(format!("{field} is required"));
            None
        }
    }
}

fn parse_date(value: Option<String>, field: &str, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let raw = required_text(value, field, errors)?;
    match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(format!("{field} must be a valid ISO date (YYYY-MM-DD)"));
            None
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub name: String,
    pub birth_date: String,
    pub document: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for PatientResponse {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id.to_string(),
            name: patient.name,
            birth_date: patient.birth_date.to_string(),
            document: patient.document,
            created_at: patient.created_at.to_rfc3339(),
            updated_at: patient.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamResponse {
    pub id: String,
    pub patient_id: String,
    pub modality: String,
    pub exam_date: String,
    pub idempotency_key: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Exam> for ExamResponse {
    fn from(exam: Exam) -> Self {
        Self {
            id: exam.id.to_string(),
            patient_id: exam.patient_id.to_string(),
            modality: exam.modality.to_string(),
            exam_date: exam.exam_date.to_string(),
            idempotency_key: exam.idempotency_key,
            created_at: exam.created_at.to_rfc3339(),
            updated_at: exam.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientPage {
    pub data: Vec<PatientResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl From<Page<Patient>> for PatientPage {
    fn from(page: Page<Patient>) -> Self {
        Self {
            data: page.data.into_iter().map(PatientResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamPage {
    pub data: Vec<ExamResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl From<Page<Exam>> for ExamPage {
    fn from(page: Page<Exam>) -> Self {
        Self {
            data: page.data.into_iter().map(ExamResponse::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exam_request(modality: &str) -> CreateExamRequest {
        CreateExamRequest {
            patient_id: Some(Uuid::new_v4().to_string()),
            modality: Some(modality.into()),
            exam_date: Some("2026-03-10".into()),
            idempotency_key: Some("req-001".into()),
        }
    }

    #[test]
    fn test_valid_exam_request() {
        let input = exam_request("CT").validate().unwrap();
        assert_eq!(input.modality, Modality::Ct);
        assert_eq!(input.idempotency_key, "req-001");
    }

    #[test]
    fn test_every_modality_code_accepted() {
        for modality in Modality::ALL {
            assert!(exam_request(modality.as_str()).validate().is_ok());
        }
    }

    #[test]
    fn test_unknown_modality_rejected() {
        let errors = exam_request("PET").validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("modality must be one of"));
    }

    #[test]
    fn test_missing_exam_fields_collect_all_messages() {
        let errors = CreateExamRequest {
            patient_id: None,
            modality: None,
            exam_date: None,
            idempotency_key: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"patientId is required".to_string()));
        assert!(errors.contains(&"idempotencyKey is required".to_string()));
    }

    #[test]
    fn test_idempotency_key_bounds() {
        let mut request = exam_request("CT");
        request.idempotency_key = Some("k".repeat(255));
        assert!(request.validate().is_ok());

        let mut request = exam_request("CT");
        request.idempotency_key = Some("k".repeat(256));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_malformed_patient_id_and_date() {
        let errors = CreateExamRequest {
            patient_id: Some("not-a-uuid".into()),
            modality: Some("MR".into()),
            exam_date: Some("10/03/2026".into()),
            idempotency_key: Some("req-001".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_patient_request_bounds() {
        let ok = CreatePatientRequest {
            name: Some("Maria Silva".into()),
            birth_date: Some("1988-04-12".into()),
            document: Some("12345678900".into()),
        };
        assert!(ok.validate().is_ok());

        let errors = CreatePatientRequest {
            name: Some("M".into()),
            birth_date: Some("1988-04-12".into()),
            document: Some("1234".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_empty_patient_request() {
        let errors = CreatePatientRequest {
            name: None,
            birth_date: None,
            document: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
