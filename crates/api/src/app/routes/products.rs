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
        "/products",
        get(list_products)
            .post(create_product)
            .fallback(system::not_found),
    )
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.products.list().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::storage_error(services.environment, "Error fetching products", &e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.products.create(&body).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::repository_error(services.environment, "Error creating product", e),
    }
}
