//! Integration tests for archive job endpoints.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_inline_archive_is_done() {
    let app = helpers::TestApp::new();
    app.write_file("small.txt", 10);
    app.write_file("large.txt", 300);
    app.write_file("medium.txt", 100);

    let response = app
        .post("/api/archive", json!({ "file": "out.zip", "dir": app.dir() }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["status"], "done");
    assert!(!response.id().is_empty());

    // Largest first.
    assert_eq!(
        helpers::zip_names(&app.path("out.zip")),
        vec!["large.txt", "medium.txt", "small.txt"]
    );
}

#[tokio::test]
async fn test_archive_name_filter() {
    let app = helpers::TestApp::new();
    app.write_file("keep.txt", 5);
    app.write_file("other.txt", 500);
    app.write_file("keep.csv", 7);

    let response = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "filteredNames": "keep" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    // One file per base name, first in listing order.
    assert_eq!(helpers::zip_names(&app.path("out.zip")), vec!["keep.csv"]);
}

#[tokio::test]
async fn test_archive_excludes_its_own_target() {
    let app = helpers::TestApp::new();
    app.write_file("a.txt", 10);
    // A leftover from an earlier run with the same name.
    app.write_file("out.zip", 1000);

    let response = app
        .post("/api/archive", json!({ "file": "out.zip", "dir": app.dir() }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(helpers::zip_names(&app.path("out.zip")), vec!["a.txt"]);
}

#[tokio::test]
async fn test_background_archive_stays_new() {
    let app = helpers::TestApp::new();
    app.write_file("a.txt", 10);

    let response = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "background": true }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "new");
    assert!(!app.path("out.zip").exists());

    let status = app.get(&format!("/api/archive/{}", response.id())).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.data()["status"], "new");
}

#[tokio::test]
async fn test_get_archive_status_fields() {
    let app = helpers::TestApp::new();
    app.write_file("a.txt", 10);

    let created = app
        .post(
            "/api/archive",
            json!({ "file": "out.zip", "dir": app.dir(), "algorithm": "zip" }),
        )
        .await;
    let id = created.id();

    let response = app.get(&format!("/api/archive/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();
    assert_eq!(data["id"], id.as_str());
    assert_eq!(data["file"], "out.zip");
    assert_eq!(data["dir"], app.dir().as_str());
    assert_eq!(data["status"], "done");
    assert!(data["createdOn"].is_string());
    assert!(data.get("errorMessage").is_none());
}

#[tokio::test]
async fn test_archive_id_is_not_an_extract_id() {
    let app = helpers::TestApp::new();
    app.write_file("a.txt", 10);

    let created = app
        .post("/api/archive", json!({ "file": "out.zip", "dir": app.dir() }))
        .await;

    let response = app.get(&format!("/api/extract/{}", created.id())).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_archive_is_not_found() {
    let app = helpers::TestApp::new();

    let response = app
        .get(&format!("/api/archive/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = helpers::TestApp::new();

    let response = app.get("/api/archive/not-a-uuid").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_missing_file_is_bad_request() {
    let app = helpers::TestApp::new();

    let response = app.post("/api/archive", json!({ "dir": app.dir() })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_archive_missing_dir_is_bad_request() {
    let app = helpers::TestApp::new();

    let response = app.post("/api/archive", json!({ "file": "out.zip" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_file_must_be_plain_name() {
    let app = helpers::TestApp::new();

    let response = app
        .post(
            "/api/archive",
            json!({ "file": "../escape.zip", "dir": app.dir() }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!app.workdir.path().join("../escape.zip").exists());
}

#[tokio::test]
async fn test_archive_of_missing_directory_fails() {
    let app = helpers::TestApp::new();
    let missing = app.path("nowhere").display().to_string();

    let response = app
        .post("/api/archive", json!({ "file": "out.zip", "dir": missing }))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "STORAGE_ERROR");
}
