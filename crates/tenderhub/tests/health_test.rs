//! integration tests for the `/health` and `/api/ping` endpoints

mod api_common;

use api_common::ApiFixture;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde::Deserialize;
use tenderhub::create_app;
use tenderhub_db::TenderhubDb;
use tower::ServiceExt;

/// response from the `/health` endpoint
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// test that GET /health returns pass status for healthy database
#[tokio::test]
async fn test_health_endpoint_returns_pass() {
    let db = TenderhubDb::new_in_memory()
        .await
        .expect("failed to create in-memory database");
    let app = create_app(db);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("failed to build request");

    let response = app.oneshot(request).await.expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .expect("should have content-type header")
        .to_str()
        .expect("content-type should be valid string");
    assert!(
        content_type.contains("application/health+json"),
        "content-type should be application/health+json, got: {}",
        content_type
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let health_response: HealthResponse =
        serde_json::from_slice(&body).expect("failed to parse response");

    assert_eq!(health_response.status, "pass");
}

#[tokio::test]
async fn test_ping_returns_ok() {
    let fixture = ApiFixture::with_reps(0).await;
    let (status, body) = fixture.send("GET", "/api/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::Value::String("ok".into()));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let fixture = ApiFixture::with_reps(0).await;
    let (status, _) = fixture.send("GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
