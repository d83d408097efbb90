use std::sync::Arc;

use axum::{
    extract::Extension,
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};

use crate::app::dto::HealthResponse;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/health", get(health).fallback(not_found))
}

/// Liveness plus the cached persistence state. Never touches the store.
pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: services.started_at.elapsed().as_secs_f64(),
        persistence: services.connection.state(),
    })
}

pub async fn not_found() -> Response {
    errors::not_found()
}
