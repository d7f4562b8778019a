//! Per-request deadline.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use archive_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Answers 504 when the handler runs past `server.request_timeout_seconds`.
///
/// The handler future is dropped; codec work already on the blocking pool
/// runs to completion without updating the job.
pub async fn request_deadline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = Duration::from_secs(state.config.server.request_timeout_seconds);
    let path = request.uri().path().to_string();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, timeout_s = limit.as_secs(), "Request deadline exceeded");
            ApiError::from(AppError::timeout(format!(
                "Request did not finish within {}s",
                limit.as_secs()
            )))
            .into_response()
        }
    }
}
