//! Archive job handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use archive_core::error::AppError;
use archive_entity::job::JobKind;

use crate::dto::request::ArchiveRequest;
use crate::dto::response::{ApiResponse, JobCreatedResponse, JobStatusResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/archive
pub async fn create_archive(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ArchiveRequest>,
) -> Result<Json<ApiResponse<JobCreatedResponse>>, ApiError> {
    let job = state.engine.create_archive(req.into_create_job()).await?;
    Ok(Json(ApiResponse::ok(JobCreatedResponse::from(&job))))
}

/// GET /api/archive/{id}
pub async fn get_archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobStatusResponse>>, ApiError> {
    let job = state
        .engine
        .get_status(JobKind::Archive, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Archive job {id} not found")))?;

    Ok(Json(ApiResponse::ok(JobStatusResponse::from(job))))
}
