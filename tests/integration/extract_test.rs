//! Integration tests for extract job endpoints.

mod helpers;

use std::fs;

use axum::http::StatusCode;
use serde_json::json;

fn seed_archive(app: &helpers::TestApp) {
    helpers::write_zip(
        &app.path("in.zip"),
        &[
            ("one.txt", b"first"),
            ("two.txt", b"second"),
            ("docs/three.md", b"third"),
        ],
    );
}

#[tokio::test]
async fn test_inline_extract_writes_every_entry() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    let response = app
        .post("/api/extract", json!({ "file": "in.zip", "dir": app.dir() }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "done");
    assert_eq!(fs::read(app.path("one.txt")).unwrap(), b"first");
    assert_eq!(fs::read(app.path("two.txt")).unwrap(), b"second");
    assert_eq!(fs::read(app.path("docs/three.md")).unwrap(), b"third");
}

#[tokio::test]
async fn test_partial_extraction_by_index() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    let response = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "partialExtraction": "2" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!app.path("one.txt").exists());
    assert_eq!(fs::read(app.path("two.txt")).unwrap(), b"second");
    assert!(!app.path("docs/three.md").exists());
}

#[tokio::test]
async fn test_name_filter_wins_over_index_filter() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    let response = app
        .post(
            "/api/extract",
            json!({
                "file": "in.zip",
                "dir": app.dir(),
                "filteredNames": "three",
                "partialExtraction": "1|2",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!app.path("one.txt").exists());
    assert!(!app.path("two.txt").exists());
    assert!(app.path("docs/three.md").exists());
}

#[tokio::test]
async fn test_name_filter_extracts_every_match() {
    let app = helpers::TestApp::new();
    helpers::write_zip(
        &app.path("in.zip"),
        &[
            ("doc.txt", b"text"),
            ("doc.csv", b"a,b"),
            ("memo.md", b"memo"),
            ("old/doc.bak", b"backup"),
        ],
    );

    let response = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "filteredNames": "doc" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(fs::read(app.path("doc.txt")).unwrap(), b"text");
    assert_eq!(fs::read(app.path("doc.csv")).unwrap(), b"a,b");
    assert_eq!(fs::read(app.path("old/doc.bak")).unwrap(), b"backup");
    assert!(!app.path("memo.md").exists());
}

#[tokio::test]
async fn test_name_filter_by_stored_path() {
    let app = helpers::TestApp::new();
    helpers::write_zip(
        &app.path("in.zip"),
        &[
            ("docs/three.md", b"third"),
            ("misc/three.md", b"other"),
            ("one.txt", b"first"),
        ],
    );

    let response = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "filteredNames": "docs/three" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(fs::read(app.path("docs/three.md")).unwrap(), b"third");
    assert!(!app.path("misc/three.md").exists());
    assert!(!app.path("one.txt").exists());
}

#[tokio::test]
async fn test_out_of_range_index_extracts_nothing() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    let response = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "partialExtraction": "9" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "done");
    assert!(!app.path("one.txt").exists());
}

#[tokio::test]
async fn test_invalid_index_is_bad_request() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    for bad in ["two", "0", "1|-3", "4294967295"] {
        let response = app
            .post(
                "/api/extract",
                json!({ "file": "in.zip", "dir": app.dir(), "partialExtraction": bad }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "input {bad:?}");
    }
    assert!(!app.path("one.txt").exists());
}

#[tokio::test]
async fn test_path_traversal_entry_is_rejected() {
    let app = helpers::TestApp::new();
    let escapee = format!("escapee-{}.txt", uuid::Uuid::new_v4());
    let hostile = format!("../{escapee}");
    helpers::write_zip(
        &app.path("bad.zip"),
        &[
            ("before.txt", b"ok"),
            (hostile.as_str(), b"nope"),
            ("after.txt", b"never"),
        ],
    );

    let response = app
        .post("/api/extract", json!({ "file": "bad.zip", "dir": app.dir() }))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "PATH_TRAVERSAL");
    assert!(app.path("before.txt").exists());
    assert!(!app.path("after.txt").exists());
    let parent = app.workdir.path().parent().unwrap();
    assert!(!parent.join(&escapee).exists());
}

#[tokio::test]
async fn test_missing_archive_fails_inline() {
    let app = helpers::TestApp::new();

    let response = app
        .post("/api/extract", json!({ "file": "missing.zip", "dir": app.dir() }))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "CODEC_ERROR");

    // Inline jobs are never picked up by the sweep, failed or not.
    let pending = app
        .store
        .list_pending(archive_entity::job::JobKind::Extract, 10)
        .await
        .unwrap();
    assert!(pending.is_empty());
}

#[tokio::test]
async fn test_background_extract_then_status() {
    let app = helpers::TestApp::new();
    seed_archive(&app);

    let created = app
        .post(
            "/api/extract",
            json!({ "file": "in.zip", "dir": app.dir(), "background": true }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.data()["status"], "new");

    let response = app.get(&format!("/api/extract/{}", created.id())).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["file"], "in.zip");
    assert_eq!(response.data()["status"], "new");
    assert!(!app.path("one.txt").exists());
}
