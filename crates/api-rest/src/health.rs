use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthResponse)
    )
)]
/// Health check endpoint for monitoring and load balancer probes.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "medreg REST API is alive".into(),
    })
}
