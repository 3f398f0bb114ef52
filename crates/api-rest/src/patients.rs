//! Patient endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use medreg_core::PageRequest;

use crate::dto::{CreatePatientRequest, PageQuery, PatientPage, PatientResponse};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/pacientes",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient created", body = PatientResponse),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Document already registered"),
        (status = 503, description = "Storage unavailable")
    )
)]
/// Register a new patient.
///
/// Fails with `409 Conflict` when another patient already holds the same
/// document number.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let input = request.validate().map_err(ApiError::validation)?;
    let patient = state.registry.create(input)?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

#[utoipa::path(
    get,
    path = "/pacientes",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of patients, newest first", body = PatientPage),
        (status = 400, description = "Validation failure"),
        (status = 503, description = "Storage unavailable")
    )
)]
/// List patients, ordered by creation time descending.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PatientPage>, ApiError> {
    let request = PageRequest::new(query.page, query.page_size)?;
    let page = state.registry.list(request)?;
    Ok(Json(page.into()))
}
