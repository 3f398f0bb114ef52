//! Domain error to HTTP translation.
//!
//! Status mapping: validation failure and missing referenced entity are
//! `400` (not-found is 400 by contract, not 404), duplicate document is
//! `409`, transient storage failure is `503`. The body is
//! `{statusCode, message, error}` with `message` a list for validation
//! failures and a string otherwise.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medreg_core::DomainError;
use serde::Serialize;
use serde_json::{json, Value};

pub struct ApiError(DomainError);

impl ApiError {
    pub fn validation(messages: Vec<String>) -> Self {
        Self(DomainError::Validation(messages))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: Value,
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, error) = match self.0 {
            DomainError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, json!(messages), "Bad Request")
            }
            err @ DomainError::NotFound { .. } => {
                (StatusCode::BAD_REQUEST, json!(err.to_string()), "Domain Error")
            }
            err @ DomainError::Conflict { .. } => {
                (StatusCode::CONFLICT, json!(err.to_string()), "Domain Error")
            }
            DomainError::Transient(err) => {
                tracing::error!("storage failure: {err}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!("storage temporarily unavailable"),
                    "Service Unavailable",
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                status_code: status.as_u16(),
                message,
                error,
            }),
        )
            .into_response()
    }
}
