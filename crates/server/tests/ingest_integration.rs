//! Catalog-ingestion endpoint: explicit-identifier and fuzzy completion
//! flows against an in-process server.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{fixtures, TestFixture};

async fn create_pending(fixture: &TestFixture, requester_id: i64, tmdb_id: u32, title: &str, year: i32) -> String {
    fixture
        .metadata
        .add_details(fixtures::movie_details(tmdb_id, title, year))
        .await;
    let response = fixture
        .post(
            "/api/v1/requests",
            json!({ "requester_id": requester_id, "tmdb_id": tmdb_id }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_ingest_with_explicit_identifier() {
    let fixture = TestFixture::new().await;
    let id = create_pending(&fixture, 42, 4523, "Some Obscure Title", 2001).await;

    let response = fixture
        .post(
            "/api/v1/ingest",
            json!({ "text": "TMDB:4523 Movie.Name.1080p.mkv" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["path"]["strategy"], "explicit_id");
    assert_eq!(response.body["path"]["tmdb_id"], 4523);
    assert_eq!(response.body["completed"].as_array().unwrap().len(), 1);

    let fetched = fixture.get(&format!("/api/v1/requests/{}", id)).await;
    assert_eq!(fetched.body["status"], "completed");

    // The requester heard about it.
    assert_eq!(fixture.notifier.sent_to(42).await.len(), 1);
}

#[tokio::test]
async fn test_ingest_fuzzy_fallback() {
    let fixture = TestFixture::new().await;
    let id = create_pending(&fixture, 42, 603, "Movie Name", 2023).await;

    let response = fixture
        .post(
            "/api/v1/ingest",
            json!({ "text": "Movie Name 2023 WEB-DL" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["path"]["strategy"], "fuzzy");
    assert_eq!(response.body["completed"].as_array().unwrap().len(), 1);

    let fetched = fixture.get(&format!("/api/v1/requests/{}", id)).await;
    assert_eq!(fetched.body["status"], "completed");
}

#[tokio::test]
async fn test_ingest_fuzzy_respects_year_window() {
    let fixture = TestFixture::new().await;
    let id = create_pending(&fixture, 42, 603, "Movie Name", 2018).await;

    let response = fixture
        .post(
            "/api/v1/ingest",
            json!({ "text": "Movie Name 2023 WEB-DL" }),
        )
        .await;

    assert_eq!(response.body["completed"].as_array().unwrap().len(), 0);

    let fetched = fixture.get(&format!("/api/v1/requests/{}", id)).await;
    assert_eq!(fetched.body["status"], "pending");
}

#[tokio::test]
async fn test_ingest_completes_multiple_requesters() {
    let fixture = TestFixture::new().await;
    create_pending(&fixture, 1, 4523, "Movie Name", 2023).await;
    create_pending(&fixture, 2, 4523, "Movie Name", 2023).await;

    let response = fixture
        .post("/api/v1/ingest", json!({ "text": "tmdb-4523 uploaded" }))
        .await;

    assert_eq!(response.body["completed"].as_array().unwrap().len(), 2);
    assert_eq!(fixture.notifier.sent().await.len(), 2);
}

#[tokio::test]
async fn test_ingest_unmatched_event_completes_nothing() {
    let fixture = TestFixture::new().await;
    let id = create_pending(&fixture, 42, 603, "Movie Name", 2023).await;

    let response = fixture
        .post(
            "/api/v1/ingest",
            json!({ "text": "Totally Different Film 1987 DVDRip" }),
        )
        .await;

    assert_eq!(response.body["completed"].as_array().unwrap().len(), 0);

    let fetched = fixture.get(&format!("/api/v1/requests/{}", id)).await;
    assert_eq!(fetched.body["status"], "pending");
}
