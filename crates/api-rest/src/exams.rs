//! Exam endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use medreg_core::PageRequest;

use crate::dto::{CreateExamRequest, ExamPage, ExamResponse, PageQuery};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/exames",
    request_body = CreateExamRequest,
    responses(
        (status = 201, description = "Exam newly created", body = ExamResponse),
        (status = 200, description = "Idempotency key already known; the original exam is returned", body = ExamResponse),
        (status = 400, description = "Validation failure or referenced patient not found"),
        (status = 503, description = "Storage unavailable")
    )
)]
/// Create an exam, idempotently.
///
/// Submissions sharing an idempotency key collapse into a single stored
/// record: the first returns `201`, every repeat returns `200` with the
/// identical body.
#[axum::debug_handler]
pub async fn create_exam(
    State(state): State<AppState>,
    Json(request): Json<CreateExamRequest>,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    let input = request.validate().map_err(ApiError::validation)?;
    let created = state.intake.create(input)?;
    let status = if created.is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(created.exam.into())))
}

#[utoipa::path(
    get,
    path = "/exames",
    params(PageQuery),
    responses(
        (status = 200, description = "Paginated list of exams, newest first", body = ExamPage),
        (status = 400, description = "Validation failure"),
        (status = 503, description = "Storage unavailable")
    )
)]
/// List exams, ordered by creation time descending.
#[axum::debug_handler]
pub async fn list_exams(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ExamPage>, ApiError> {
    let request = PageRequest::new(query.page, query.page_size)?;
    let page = state.intake.list(request)?;
    Ok(Json(page.into()))
}
