//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage backend, repositories, seeder, connection probe
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::warn;

use pulse_infra::config::{Config, CorsOrigins};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    base-uri 'self'; \
    font-src 'self' https://fonts.gstatic.com; \
    form-action 'self'; \
    frame-ancestors 'self'; \
    img-src 'self' data: https: blob:; \
    object-src 'none'; \
    script-src 'self' 'unsafe-inline'; \
    script-src-attr 'none'; \
    style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
    connect-src 'self'; \
    upgrade-insecure-requests";

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
/// Spawns the rate limiter's eviction task, so it needs a Tokio runtime.
pub fn build_app(config: &Config, services: Arc<services::AppServices>) -> Router {
    let limiter = middleware::rate_limiter(&config.rate_limit);
    middleware::spawn_eviction(&limiter);

    let api = routes::router()
        .fallback(routes::system::not_found)
        .layer(axum::middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit,
        ));

    // Everything outside /api is the single-page app shell.
    let spa = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let app = Router::new()
        .nest("/api", api)
        .fallback_service(spa)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&config.cors_origins))
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(DefaultBodyLimit::max(BODY_LIMIT))
                .layer(Extension(services)),
        );

    if config.environment.is_production() {
        app
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    // Credentials rule out a literal `*`, so "any" echoes the caller's origin.
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::mirror_request(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!(%origin, "ignoring invalid CORS origin"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
