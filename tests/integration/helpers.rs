//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use archive_api::{AppState, build_router};
use archive_core::config::AppConfig;
use archive_database::{JobStore, MemoryJobStore};
use archive_service::JobEngine;
use archive_worker::{OutcomeReceiver, Sweeper};

/// Test application backed by the in-memory job store and a scratch directory.
pub struct TestApp {
    pub router: Router,
    pub engine: JobEngine,
    pub store: Arc<dyn JobStore>,
    pub config: AppConfig,
    pub workdir: TempDir,
}

impl TestApp {
    /// Create a new test application with default configuration.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryJobStore::new()), AppConfig::default())
    }

    /// Create a test application over a caller-provided store.
    pub fn with_store(store: Arc<dyn JobStore>, config: AppConfig) -> Self {
        let engine = JobEngine::new(Arc::clone(&store), config.selection.clone());
        let state = AppState::new(Arc::new(config.clone()), engine.clone());
        let router = build_router(state);
        let workdir = tempfile::tempdir().expect("Failed to create scratch directory");

        Self {
            router,
            engine,
            store,
            config,
            workdir,
        }
    }

    /// Sweeper over the same engine the router uses.
    pub fn sweeper(&self) -> (Sweeper, OutcomeReceiver) {
        Sweeper::new(self.engine.clone(), self.config.worker.clone())
    }

    /// Scratch directory as the string clients send in `dir`.
    pub fn dir(&self) -> String {
        self.workdir.path().display().to_string()
    }

    /// Path inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.workdir.path().join(name)
    }

    /// Write a file of `len` bytes into the scratch directory.
    pub fn write_file(&self, name: &str, len: usize) {
        fs::write(self.path(name), vec![b'x'; len]).expect("Failed to write fixture");
    }

    /// Make an HTTP request to the test app.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        let body = match body {
            Some(json) => {
                builder = builder.header("Content-Length", json.to_string().len());
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let req = builder.body(body).expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    /// GET without a body.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }
}

/// Test HTTP response.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `data` object of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The job id from a creation or status response.
    pub fn id(&self) -> String {
        self.data()["id"]
            .as_str()
            .expect("Response carries no job id")
            .to_string()
    }
}

/// Build a zip at `path` with the given `(name, contents)` entries, in order.
///
/// Names are stored verbatim, so callers can plant hostile entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).expect("Failed to create zip");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, contents) in entries {
        zip.start_file(*name, options).expect("Failed to start entry");
        zip.write_all(contents).expect("Failed to write entry");
    }
    zip.finish().expect("Failed to finish zip");
}

/// Entry names of the zip at `path`, in archive order.
pub fn zip_names(path: &Path) -> Vec<String> {
    archive_codec::list_entries(path)
        .expect("Failed to list archive")
        .into_iter()
        .map(|e| e.name)
        .collect()
}
