//! Integration tests for the authenticated transport
//!
//! These tests run the transport against an in-process stub API and verify:
//! - the no-token fast path fails before any network I/O
//! - the bearer token is attached to outbound requests
//! - non-2xx responses become status-bearing failures
//! - non-JSON success bodies fall back to raw text

use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Method;
use serde_json::json;
use tempfile::TempDir;

use shorty_admin::error::ApiError;
use shorty_admin::token::TokenStore;
use shorty_admin::transport::{ApiBody, Transport};

/// Starts the stub API on an ephemeral port and returns its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    format!("http://{}", addr)
}

/// Token store backed by a fresh temp directory, pre-loaded with a token
fn stored_token(token: &str) -> (TokenStore, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TokenStore::new(dir.path().join("token"));
    store.save(token).expect("Failed to save token");
    (store, dir)
}

fn stub_routes() -> Router {
    Router::new()
        .route("/json", get(|| async { Json(json!(["a", "b"])) }))
        .route("/text", get(|| async { "plain body" }))
        .route(
            "/conflict",
            get(|| async { (StatusCode::CONFLICT, "taken") }),
        )
        .route(
            "/echo-auth",
            get(|headers: HeaderMap| async move {
                headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("missing")
                    .to_string()
            }),
        )
}

#[tokio::test]
async fn test_no_token_fails_before_any_network_call() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = TokenStore::new(dir.path().join("token"));
    let transport = Transport::new(store);

    // Nothing listens on this address; a network attempt would surface as
    // ApiError::Network, not NoToken
    let result = transport
        .request(Method::GET, "http://127.0.0.1:9/never", None)
        .await;

    assert!(matches!(result, Err(ApiError::NoToken)));
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let base = spawn_stub(stub_routes()).await;
    let (store, _dir) = stored_token("sekrit");
    let transport = Transport::new(store);

    let body = transport
        .request(Method::GET, &format!("{}/echo-auth", base), None)
        .await
        .expect("request failed");

    match body {
        ApiBody::Text(raw) => assert_eq!(raw, "Bearer sekrit"),
        ApiBody::Json(other) => panic!("expected text echo, got {other}"),
    }
}

#[tokio::test]
async fn test_non_2xx_becomes_status_bearing_failure() {
    let base = spawn_stub(stub_routes()).await;
    let (store, _dir) = stored_token("sekrit");
    let transport = Transport::new(store);

    let err = transport
        .request(Method::GET, &format!("{}/conflict", base), None)
        .await
        .expect_err("conflict should fail");

    assert_eq!(err.status(), Some(409));
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn test_json_success_body_is_parsed() {
    let base = spawn_stub(stub_routes()).await;
    let (store, _dir) = stored_token("sekrit");
    let transport = Transport::new(store);

    let values: Vec<String> = transport
        .request(Method::GET, &format!("{}/json", base), None)
        .await
        .expect("request failed")
        .json()
        .expect("decode failed");

    assert_eq!(values, vec!["a", "b"]);
}

#[tokio::test]
async fn test_non_json_success_body_falls_back_to_raw_text() {
    let base = spawn_stub(stub_routes()).await;
    let (store, _dir) = stored_token("sekrit");
    let transport = Transport::new(store);

    let body = transport
        .request(Method::GET, &format!("{}/text", base), None)
        .await
        .expect("request failed");

    assert!(matches!(body, ApiBody::Text(raw) if raw == "plain body"));
}

#[tokio::test]
async fn test_quoted_token_file_is_dequoted() {
    let base = spawn_stub(stub_routes()).await;
    let dir = TempDir::new().expect("Failed to create temp dir");
    let token_path = dir.path().join("token");
    // Raw quoted value as the browser login flow persists it
    std::fs::write(&token_path, "\"sekrit\"").expect("Failed to write token");

    let transport = Transport::new(TokenStore::new(token_path));
    let body = transport
        .request(Method::GET, &format!("{}/echo-auth", base), None)
        .await
        .expect("request failed");

    assert!(matches!(body, ApiBody::Text(raw) if raw == "Bearer sekrit"));
}
