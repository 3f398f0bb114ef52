//! REST surface for the medreg records service.
//!
//! The router is built here (rather than in `main.rs`) so integration tests
//! can drive it directly with `tower::ServiceExt::oneshot`.

pub mod dto;
pub mod error;

mod exams;
mod health;
mod patients;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use medreg_core::{ExamIntake, PatientRegistry};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across request handlers.
///
/// Services are constructed by the caller and injected here; handlers hold
/// no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<PatientRegistry>,
    pub intake: Arc<ExamIntake>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        patients::create_patient,
        patients::list_patients,
        exams::create_exam,
        exams::list_exams,
    ),
    components(schemas(
        health::HealthResponse,
        dto::CreatePatientRequest,
        dto::PatientResponse,
        dto::PatientPage,
        dto::CreateExamRequest,
        dto::ExamResponse,
        dto::ExamPage,
    ))
)]
struct ApiDoc;

/// Build the application router around the injected services.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/pacientes", post(patients::create_patient))
        .route("/pacientes", get(patients::list_patients))
        .route("/exames", post(exams::create_exam))
        .route("/exames", get(exams::list_exams))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
