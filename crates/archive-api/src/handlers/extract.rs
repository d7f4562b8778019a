//! Extract job handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use archive_core::error::AppError;
use archive_entity::job::JobKind;

use crate::dto::request::ExtractRequest;
use crate::dto::response::{ApiResponse, JobCreatedResponse, JobStatusResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/extract
pub async fn create_extract(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ExtractRequest>,
) -> Result<Json<ApiResponse<JobCreatedResponse>>, ApiError> {
    let job = state.engine.create_extract(req.into_create_job()?).await?;
    Ok(Json(ApiResponse::ok(JobCreatedResponse::from(&job))))
}

/// GET /api/extract/{id}
pub async fn get_extract(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<JobStatusResponse>>, ApiError> {
    let job = state
        .engine
        .get_status(JobKind::Extract, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Extract job {id} not found")))?;

    Ok(Json(ApiResponse::ok(JobStatusResponse::from(job))))
}
