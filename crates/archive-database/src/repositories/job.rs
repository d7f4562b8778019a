//! Job repository implementation.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use archive_core::error::{AppError, ErrorKind};
use archive_core::result::AppResult;
use archive_entity::job::{Job, JobKind, JobStatus};

use crate::store::JobStore;

/// PostgreSQL-backed job store. One table per [`JobKind`].
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    /// Create a new job repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current status of a job, used to explain a zero-row update.
    async fn current_status(&self, kind: JobKind, id: Uuid) -> AppResult<Option<JobStatus>> {
        sqlx::query_scalar::<_, JobStatus>(&format!(
            "SELECT status FROM {} WHERE id = $1",
            kind.table()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read job status", e))
    }

    async fn rejected(&self, kind: JobKind, id: Uuid, target: JobStatus) -> AppError {
        match self.current_status(kind, id).await {
            Ok(Some(current)) => AppError::conflict(format!(
                "{kind} job {id} cannot move from {current} to {target}"
            )),
            Ok(None) => AppError::not_found(format!("{kind} job {id} not found")),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn insert(&self, job: &Job) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (id, kind, file_name, dir, status, algorithm, filtered_names, \
             partial_extraction, background, attempts, created_on, updated_on) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            job.kind.table()
        ))
        .bind(job.id)
        .bind(job.kind)
        .bind(&job.file_name)
        .bind(&job.dir)
        .bind(job.status)
        .bind(&job.algorithm)
        .bind(&job.filtered_names)
        .bind(&job.partial_extraction)
        .bind(job.background)
        .bind(job.attempts)
        .bind(job.created_on)
        .bind(job.updated_on)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to insert {} job", job.kind),
                e,
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::database(format!(
                "Failed to insert {} job {}",
                job.kind, job.id
            )));
        }
        Ok(())
    }

    async fn update_status(&self, kind: JobKind, id: Uuid, status: JobStatus) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET status = $2, claimed_at = NULL, updated_on = NOW() \
             WHERE id = $1 AND (status <> 'done' OR $2 = 'done')",
            kind.table()
        ))
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to update {kind} job status"),
                e,
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(self.rejected(kind, id, status).await);
        }
        Ok(())
    }

    async fn find_by_id(&self, kind: JobKind, id: Uuid) -> AppResult<Option<Job>> {
        sqlx::query_as::<_, Job>(&format!("SELECT * FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, format!("Failed to find {kind} job"), e)
            })
    }

    async fn list_pending(&self, kind: JobKind, limit: usize) -> AppResult<Vec<Job>> {
        sqlx::query_as::<_, Job>(&format!(
            "SELECT * FROM {} WHERE status = 'new' AND background = TRUE \
             ORDER BY created_on ASC LIMIT $1",
            kind.table()
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to list pending {kind} jobs"),
                e,
            )
        })
    }

    async fn claim_pending(
        &self,
        kind: JobKind,
        limit: usize,
        lease: Duration,
    ) -> AppResult<Vec<Job>> {
        let table = kind.table();
        let mut jobs = sqlx::query_as::<_, Job>(&format!(
            "UPDATE {table} SET status = 'in_progress', attempts = attempts + 1, \
             claimed_at = NOW(), updated_on = NOW() \
             WHERE id IN ( \
                SELECT id FROM {table} \
                WHERE background = TRUE \
                AND (status = 'new' \
                     OR (status = 'in_progress' AND claimed_at < NOW() - make_interval(secs => $2))) \
                ORDER BY created_on ASC \
                LIMIT $1 \
                FOR UPDATE SKIP LOCKED \
             ) RETURNING *"
        ))
        .bind(limit as i64)
        .bind(lease.as_secs_f64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to claim pending {kind} jobs"),
                e,
            )
        })?;

        // RETURNING does not preserve the subquery order.
        jobs.sort_by_key(|job| job.created_on);
        Ok(jobs)
    }

    async fn release(
        &self,
        kind: JobKind,
        id: Uuid,
        error: &str,
        max_attempts: i32,
    ) -> AppResult<JobStatus> {
        let status = sqlx::query_scalar::<_, JobStatus>(&format!(
            "UPDATE {} SET \
                status = CASE WHEN attempts >= $3 THEN 'failed'::job_status ELSE 'new'::job_status END, \
                error_message = $2, claimed_at = NULL, updated_on = NOW() \
             WHERE id = $1 AND status = 'in_progress' \
             RETURNING status",
            kind.table()
        ))
        .bind(id)
        .bind(error)
        .bind(max_attempts)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to release {kind} job"),
                e,
            )
        })?;

        match status {
            Some(status) => Ok(status),
            None => Err(self.rejected(kind, id, JobStatus::New).await),
        }
    }
}
