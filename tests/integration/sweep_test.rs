//! Integration tests for background sweeps.

mod helpers;

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use archive_core::config::AppConfig;
use archive_core::result::AppResult;
use archive_database::{JobStore, MemoryJobStore};
use archive_entity::job::{Job, JobKind, JobStatus};
use archive_worker::UnitResult;

/// Delegates to a memory store but stalls on every status update.
#[derive(Debug)]
struct SlowStore {
    inner: MemoryJobStore,
    delay: Duration,
}

#[async_trait]
impl JobStore for SlowStore {
    async fn insert(&self, job: &Job) -> AppResult<()> {
        self.inner.insert(job).await
    }

    async fn update_status(&self, kind: JobKind, id: Uuid, status: JobStatus) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.update_status(kind, id, status).await
    }

    async fn find_by_id(&self, kind: JobKind, id: Uuid) -> AppResult<Option<Job>> {
        self.inner.find_by_id(kind, id).await
    }

    async fn list_pending(&self, kind: JobKind, limit: usize) -> AppResult<Vec<Job>> {
        self.inner.list_pending(kind, limit).await
    }

    async fn claim_pending(
        &self,
        kind: JobKind,
        limit: usize,
        lease: Duration,
    ) -> AppResult<Vec<Job>> {
        self.inner.claim_pending(kind, limit, lease).await
    }

    async fn release(
        &self,
        kind: JobKind,
        id: Uuid,
        error: &str,
        max_attempts: i32,
    ) -> AppResult<JobStatus> {
        self.inner.release(kind, id, error, max_attempts).await
    }
}

fn slow_app(delay: Duration, job_timeout_seconds: u64) -> helpers::TestApp {
    let mut config = AppConfig::default();
    config.worker.job_timeout_seconds = job_timeout_seconds;
    let store = SlowStore {
        inner: MemoryJobStore::new(),
        delay,
    };
    helpers::TestApp::with_store(Arc::new(store), config)
}

#[tokio::test]
async fn test_sweep_completes_background_archive() {
    let app = helpers::TestApp::new();
    app.write_file("a.txt", 10);

    let created = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "background": true }),
        )
        .await;
    assert_eq!(created.data()["status"], "new");

    let (sweeper, mut outcomes) = app.sweeper();
    assert_eq!(sweeper.run_archive_sweep().await.unwrap(), 1);

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.job_id.to_string(), created.id());
    assert_eq!(outcome.result, UnitResult::Completed);

    let status = app.get(&format!("/api/archive/{}", created.id())).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.data()["status"], "done");
    assert_eq!(helpers::zip_names(&app.path("out.zip")), vec!["a.txt"]);
}

#[tokio::test]
async fn test_archive_sweep_leaves_extract_jobs() {
    let app = helpers::TestApp::new();
    helpers::write_zip(&app.path("in.zip"), &[("one.txt", b"first")]);

    let created = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "background": true }),
        )
        .await;

    let (sweeper, mut outcomes) = app.sweeper();
    assert_eq!(sweeper.run_archive_sweep().await.unwrap(), 0);
    assert_eq!(sweeper.run_extract_sweep().await.unwrap(), 1);

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.kind, JobKind::Extract);
    assert_eq!(outcome.result, UnitResult::Completed);
    assert_eq!(fs::read(app.path("one.txt")).unwrap(), b"first");

    let status = app.get(&format!("/api/extract/{}", created.id())).await;
    assert_eq!(status.data()["status"], "done");
}

#[tokio::test]
async fn test_list_pending_is_bounded_and_repeatable() {
    let app = helpers::TestApp::new();
    for i in 0..15 {
        app.post(
            "/api/archive",
            json!({ "file": format!("out-{i}.zip"), "dir": app.dir(), "background": true }),
        )
        .await;
    }

    let first = app.store.list_pending(JobKind::Archive, 10).await.unwrap();
    let second = app.store.list_pending(JobKind::Archive, 10).await.unwrap();

    assert_eq!(first.len(), 10);
    // Listing claims nothing.
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].created_on <= w[1].created_on));
}

#[tokio::test]
async fn test_concurrent_sweeps_never_share_a_job() {
    let app = helpers::TestApp::new();
    let mut ids = HashSet::new();
    for i in 0..15 {
        let dir = app.path(&format!("job-{i}"));
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("data.txt"), b"payload").unwrap();

        let created = app
            .post(
                "/api/archive",
                json!({ "file": "out.zip", "dir": dir.display().to_string(), "background": true }),
            )
            .await;
        ids.insert(created.id());
    }

    let (sweeper, mut outcomes) = app.sweeper();
    let sweeper = Arc::new(sweeper);
    let first = tokio::spawn({
        let sweeper = Arc::clone(&sweeper);
        async move { sweeper.run_archive_sweep().await.unwrap() }
    });
    let second = tokio::spawn({
        let sweeper = Arc::clone(&sweeper);
        async move { sweeper.run_archive_sweep().await.unwrap() }
    });
    let launched = first.await.unwrap() + second.await.unwrap();
    assert_eq!(launched, 15);

    let mut seen = HashSet::new();
    for _ in 0..launched {
        let outcome = outcomes.recv().await.unwrap();
        assert_eq!(outcome.result, UnitResult::Completed);
        assert!(seen.insert(outcome.job_id.to_string()), "job launched twice");
    }
    assert_eq!(seen, ids);
}

#[tokio::test]
async fn test_unit_past_deadline_is_released() {
    let app = slow_app(Duration::from_secs(5), 1);
    app.write_file("a.txt", 10);

    let created = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "background": true }),
        )
        .await;

    let (sweeper, mut outcomes) = app.sweeper();
    assert_eq!(sweeper.run_archive_sweep().await.unwrap(), 1);

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(
        outcome.result,
        UnitResult::TimedOut {
            status: JobStatus::New
        }
    );

    let status = app.get(&format!("/api/archive/{}", created.id())).await;
    assert_eq!(status.data()["status"], "new");
    assert_eq!(status.data()["errorMessage"], "timed out after 1s");
}

#[tokio::test]
async fn test_shutdown_cancels_running_units() {
    let app = slow_app(Duration::from_secs(30), 60);
    app.write_file("a.txt", 10);

    let created = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "background": true }),
        )
        .await;

    let (sweeper, mut outcomes) = app.sweeper();
    assert_eq!(sweeper.run_archive_sweep().await.unwrap(), 1);

    assert!(sweeper.shutdown(Duration::from_secs(5)).await);
    assert_eq!(sweeper.in_flight(), 0);

    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(
        outcome.result,
        UnitResult::Cancelled {
            status: JobStatus::New
        }
    );

    let status = app.get(&format!("/api/archive/{}", created.id())).await;
    assert_eq!(status.data()["status"], "new");

    // A stopped sweeper claims nothing.
    assert_eq!(sweeper.run_archive_sweep().await.unwrap(), 0);
}
