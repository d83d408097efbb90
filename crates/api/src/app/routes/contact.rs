use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use crate::app::dto::ContactAck;
use crate::app::errors;
use crate::app::routes::system;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route(
        "/contact",
        get(list_contacts)
            .post(submit_contact)
            .fallback(system::not_found),
    )
}

/// Store a submission and answer with an acknowledgment, not the record.
pub async fn submit_contact(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::invalid_body(rejection),
    };

    match services.contacts.create(&body).await {
        Ok(contact) => {
            info!(contact_id = %contact.id, "contact message received");
            (StatusCode::CREATED, Json(ContactAck::from(&contact))).into_response()
        }
        Err(e) => errors::repository_error(services.environment, "Error sending message", e),
    }
}

pub async fn list_contacts(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.contacts.list().await {
        Ok(contacts) => Json(contacts).into_response(),
        Err(e) => errors::storage_error(services.environment, "Error fetching contacts", &e),
    }
}
