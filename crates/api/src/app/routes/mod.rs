use axum::Router;

pub mod contact;
pub mod faqs;
pub mod products;
pub mod seed;
pub mod system;

/// Router for every `/api` endpoint (paths relative to the `/api` prefix).
pub fn router() -> Router {
    Router::new()
        .merge(system::router())
        .merge(products::router())
        .merge(faqs::router())
        .merge(contact::router())
        .merge(seed::router())
}
