use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::app::errors;
use crate::app::routes::system;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route(
        "/faqs",
        get(list_faqs).post(create_faq).fallback(system::not_found),
    )
}

pub async fn list_faqs(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.faqs.list().await {
        Ok(faqs) => Json(faqs).into_response(),
        Err(e) => errors::storage_error(services.environment, "Error fetching FAQs", &e),
    }
}

pub async fn create_faq(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.faqs.create(&body).await {
        Ok(faq) => (StatusCode::CREATED, Json(faq)).into_response(),
        Err(e) => errors::repository_error(services.environment, "Error creating FAQ", e),
    }
}
