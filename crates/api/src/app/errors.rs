//! Error-to-response mapping. This is the only place storage-error detail is
//! suppressed or exposed.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use pulse_core::FieldErrors;
use pulse_infra::config::Environment;
use pulse_infra::repository::RepositoryError;
use pulse_infra::store::StoreError;

/// Detail shown to clients outside development.
pub const SUPPRESSED_DETAIL: &str = "Internal server error";

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "message": message.into() }))).into_response()
}

pub fn validation_error(errors: FieldErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "message": "Validation error",
            "details": errors,
        })),
    )
        .into_response()
}

/// 500 with `message` as the operation summary; the underlying error is
/// logged in full but only echoed to the client in development.
pub fn storage_error(environment: Environment, message: &'static str, err: &StoreError) -> Response {
    error!(error = %err, "{message}");
    let detail = if environment.exposes_error_detail() {
        err.to_string()
    } else {
        SUPPRESSED_DETAIL.to_string()
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "message": message,
            "error": detail,
        })),
    )
        .into_response()
}

pub fn repository_error(environment: Environment, message: &'static str, err: RepositoryError) -> Response {
    match err {
        RepositoryError::Validation(errors) => validation_error(errors),
        RepositoryError::Storage(e) => storage_error(environment, message, &e),
    }
}

/// Body that could not be read as JSON at all. Always a 400, whatever the
/// rejection kind.
pub fn invalid_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "message": "Invalid JSON body",
            "details": [rejection.body_text()],
        })),
    )
        .into_response()
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "API endpoint not found")
}

pub fn too_many_requests() -> Response {
    json_error(
        StatusCode::TOO_MANY_REQUESTS,
        "Too many requests from this IP, please try again later.",
    )
}
