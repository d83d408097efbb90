//! HTTP API: routing, request/response mapping and middleware.

pub mod app;
pub mod middleware;
