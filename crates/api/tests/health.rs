//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, seeded_store};
use routemix_core::allocation::{BucketAllocation, PersistedAllocation, TrunkEntry, ValidAllocation};
use routemix_core::error::CoreError;
use routemix_core::store::AllocationStore;
use tower::ServiceExt;

/// A store whose backend is unreachable.
struct DownStore;

#[async_trait]
impl AllocationStore for DownStore {
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }

    async fn fetch_allocation(&self, _: &str) -> Result<Vec<PersistedAllocation>, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }

    async fn replace_allocation(
        &self,
        _: &str,
        _: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }

    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }

    async fn delete_allocation(&self, _: &str) -> Result<u64, CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Err(CoreError::Internal("connection refused".into()))
    }
}

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let app = common::build_test_app(seeded_store());
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
    assert!(json["checked_at"].is_string());
}

#[tokio::test]
async fn health_check_reports_degraded_store() {
    let app = common::build_test_app(Arc::new(DownStore));
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app(seeded_store());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Route '/this-route-does-not-exist' not found");
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app(seeded_store());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // MakeRequestUuid produces a hyphenated v4 UUID.
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let app = common::build_test_app(seeded_store());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/routemix/batch-save")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("http://localhost:5173")
    );
}
