//! Route definitions for the archive service HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;

    let api_routes = Router::new()
        .merge(archive_routes())
        .merge(extract_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_deadline,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Archive creation and status
fn archive_routes() -> Router<AppState> {
    Router::new()
        .route("/archive", post(handlers::archive::create_archive))
        .route("/archive/{id}", get(handlers::archive::get_archive))
}

/// Extract creation and status
fn extract_routes() -> Router<AppState> {
    Router::new()
        .route("/extract", post(handlers::extract::create_extract))
        .route("/extract/{id}", get(handlers::extract::get_extract))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
