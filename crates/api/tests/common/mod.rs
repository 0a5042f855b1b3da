#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use routemix_api::auth::jwt::{generate_access_token, JwtConfig};
use routemix_api::config::ServerConfig;
use routemix_api::router::build_app_router;
use routemix_api::state::AppState;
use routemix_core::store::{AllocationStore, InMemoryAllocationStore};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: "routemix-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Sign a token for the given role with the test secret.
pub fn token_for(role: &str) -> String {
    generate_access_token(1, role, &test_config().jwt).expect("token generation should succeed")
}

/// An in-memory store whose directory holds `TrunkA`..`TrunkC` and `LB-Trunk-1`.
pub fn seeded_store() -> Arc<InMemoryAllocationStore> {
    Arc::new(InMemoryAllocationStore::with_trunks([
        "LB-Trunk-1",
        "TrunkA",
        "TrunkB",
        "TrunkC",
    ]))
}

/// Build the full application router over the given store.
pub fn build_test_app(store: Arc<dyn AllocationStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// GET with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Unauthenticated JSON POST.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// JSON POST with a bearer token.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// DELETE with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
