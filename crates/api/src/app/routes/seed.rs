use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use pulse_infra::seed::SeedError;

use crate::app::dto::{InitDataRequest, InitDataResponse};
use crate::app::errors;
use crate::app::routes::system;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/init-data", post(init_data).fallback(system::not_found))
}

/// Seed the sample dataset. A request without a JSON body means `force = false`.
pub async fn init_data(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(body)) => InitDataRequest::from_body(&body),
        Err(JsonRejection::MissingJsonContentType(_)) => InitDataRequest::default(),
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.seeder.run(request.force).await {
        Ok(outcome) => Json(InitDataResponse::from(outcome)).into_response(),
        Err(SeedError::Storage(e)) => {
            errors::storage_error(services.environment, "Error initializing sample data", &e)
        }
    }
}
