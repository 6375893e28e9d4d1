//! Integration tests for the resource clients and action coordinators
//!
//! A stateful in-process stub plays the shorty API. The tests verify the
//! full mutation flow: client call, cache invalidation, the
//! exactly-one-revalidation rule, and the status-code to message mapping.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::json;
use tempfile::TempDir;

use shorty_admin::actions::{AdminActions, PathActions};
use shorty_admin::cache::ReadCache;
use shorty_admin::client::{AdminClient, UrlClient};
use shorty_admin::config::Config;
use shorty_admin::model::{AdminPayload, MappingPayload, MessageKind, UrlMapping};
use shorty_admin::token::TokenStore;
use shorty_admin::transport::Transport;

#[derive(Clone)]
struct StubState {
    mappings: Arc<Mutex<Vec<UrlMapping>>>,
    admins: Arc<Mutex<Vec<String>>>,
    mapping_list_hits: Arc<AtomicUsize>,
    admin_list_hits: Arc<AtomicUsize>,
}

impl StubState {
    fn new() -> Self {
        StubState {
            mappings: Arc::new(Mutex::new(Vec::new())),
            admins: Arc::new(Mutex::new(Vec::new())),
            mapping_list_hits: Arc::new(AtomicUsize::new(0)),
            admin_list_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn seed_mapping(&self, path: &str, url: &str) {
        self.mappings.lock().unwrap().push(UrlMapping {
            path: path.to_string(),
            url: url.to_string(),
            owner: "tester@example.com".to_string(),
            modify: true,
        });
    }
}

async fn list_mappings(State(state): State<StubState>) -> Json<Vec<UrlMapping>> {
    state.mapping_list_hits.fetch_add(1, Ordering::SeqCst);
    Json(state.mappings.lock().unwrap().clone())
}

async fn create_mapping(
    State(state): State<StubState>,
    Json(payload): Json<MappingPayload>,
) -> impl IntoResponse {
    let mut mappings = state.mappings.lock().unwrap();
    if mappings.iter().any(|m| m.path == payload.path) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "error": "path exists" })),
        )
            .into_response();
    }
    mappings.push(UrlMapping {
        path: payload.path.clone(),
        url: payload.url.clone(),
        owner: "tester@example.com".to_string(),
        modify: true,
    });
    (StatusCode::CREATED, Json(json!(payload))).into_response()
}

async fn update_mapping(
    Path(path): Path<String>,
    State(state): State<StubState>,
    Json(payload): Json<MappingPayload>,
) -> impl IntoResponse {
    let mut mappings = state.mappings.lock().unwrap();
    match mappings.iter_mut().find(|m| m.path == path) {
        Some(mapping) => {
            mapping.url = payload.url.clone();
            Json(mapping.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn delete_mapping(
    Path(path): Path<String>,
    State(state): State<StubState>,
) -> StatusCode {
    let mut mappings = state.mappings.lock().unwrap();
    let before = mappings.len();
    mappings.retain(|m| m.path != path);
    if mappings.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn list_admins(State(state): State<StubState>) -> Json<Vec<String>> {
    state.admin_list_hits.fetch_add(1, Ordering::SeqCst);
    Json(state.admins.lock().unwrap().clone())
}

async fn create_admin(
    State(state): State<StubState>,
    Json(payload): Json<AdminPayload>,
) -> impl IntoResponse {
    let mut admins = state.admins.lock().unwrap();
    if admins.contains(&payload.email) {
        return (StatusCode::CONFLICT, Json(json!({ "error": "exists" }))).into_response();
    }
    admins.push(payload.email);
    StatusCode::CREATED.into_response()
}

async fn delete_admin(
    Path(email): Path<String>,
    State(state): State<StubState>,
) -> StatusCode {
    state.admins.lock().unwrap().retain(|a| a != &email);
    StatusCode::NO_CONTENT
}

fn stub_app(state: StubState) -> Router {
    Router::new()
        .route("/admin/", get(list_mappings).post(create_mapping))
        .route("/admin/user", get(list_admins).post(create_admin))
        .route("/admin/user/{email}", delete(delete_admin))
        .route(
            "/admin/{path}",
            axum::routing::patch(update_mapping).delete(delete_mapping),
        )
        .with_state(state)
}

/// Starts the stub and builds the client stack against it
async fn setup(state: StubState) -> (PathActions, AdminActions, TempDir) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, stub_app(state))
            .await
            .expect("stub server failed");
    });

    let dir = TempDir::new().expect("Failed to create temp dir");
    let tokens = TokenStore::new(dir.path().join("token"));
    tokens.save("test-token").expect("Failed to save token");

    let config = Config {
        api_url: format!("http://{}", addr),
        auth_url: "http://localhost:5556".to_string(),
        redirect_uri: "http://localhost:5173".to_string(),
        client_id: "shortyfront".to_string(),
        token_file: dir.path().join("token").display().to_string(),
    };

    let transport = Transport::new(tokens);
    let cache = Arc::new(ReadCache::new());
    let paths = PathActions::new(UrlClient::new(transport.clone(), &config), cache.clone());
    let admins = AdminActions::new(AdminClient::new(transport, &config), cache);
    (paths, admins, dir)
}

fn payload(path: &str, url: &str) -> MappingPayload {
    MappingPayload {
        path: path.to_string(),
        url: url.to_string(),
    }
}

#[tokio::test]
async fn test_create_revalidates_the_collection_exactly_once() {
    let state = StubState::new();
    let hits = state.mapping_list_hits.clone();
    let (paths, _admins, _dir) = setup(state).await;

    paths
        .submit(&payload("docs", "https://example.com/handbook"), Instant::now())
        .await
        .expect("create failed");

    // One fetch total: the post-mutation revalidation
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // The follow-up read is served from the refreshed cache
    let mappings = paths.mappings().await.expect("list failed");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].path, "docs");

    let message = paths.form_message(Instant::now()).expect("missing message");
    assert_eq!(message.kind, MessageKind::Success);
    assert_eq!(message.text, "URL has been shortened successfully!");
}

#[tokio::test]
async fn test_create_conflict_surfaces_the_named_path() {
    let state = StubState::new();
    state.seed_mapping("docs", "https://example.com/old");
    let hits = state.mapping_list_hits.clone();
    let (paths, _admins, _dir) = setup(state).await;

    let err = paths
        .submit(&payload("docs", "https://example.com/new"), Instant::now())
        .await
        .expect_err("duplicate create should fail");

    assert_eq!(err.status(), Some(409));
    // Failed mutations do not trigger a revalidation
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let message = paths.form_message(Instant::now()).expect("missing message");
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.text, "Path \"docs\" already exists.");
}

#[tokio::test]
async fn test_update_refreshes_cache_and_sets_row_message() {
    let state = StubState::new();
    state.seed_mapping("docs", "https://example.com/old");
    let hits = state.mapping_list_hits.clone();
    let (paths, _admins, _dir) = setup(state).await;

    // Warm the cache first, as the list view would
    paths.mappings().await.expect("list failed");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    paths
        .update(&payload("docs", "https://example.com/new"), Instant::now())
        .await
        .expect("update failed");
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    let mappings = paths.mappings().await.expect("list failed");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(mappings[0].url, "https://example.com/new");

    let message = paths
        .row_message("docs", Instant::now())
        .expect("missing row message");
    assert_eq!(message.text, "Path updated successfully!");
}

#[tokio::test]
async fn test_delete_refreshes_cache_and_sets_list_message() {
    let state = StubState::new();
    state.seed_mapping("docs", "https://example.com/handbook");
    let (paths, _admins, _dir) = setup(state).await;

    paths.delete("docs", Instant::now()).await.expect("delete failed");

    let mappings = paths.mappings().await.expect("list failed");
    assert!(mappings.is_empty());

    let message = paths.list_message(Instant::now()).expect("missing message");
    assert_eq!(message.kind, MessageKind::Success);
    assert_eq!(message.text, "Path \"docs\" deleted successfully!");
}

#[tokio::test]
async fn test_delete_failure_maps_to_generic_list_message() {
    let state = StubState::new();
    let (paths, _admins, _dir) = setup(state).await;

    let err = paths
        .delete("missing", Instant::now())
        .await
        .expect_err("deleting an unknown path should fail");
    assert_eq!(err.status(), Some(404));

    let message = paths.list_message(Instant::now()).expect("missing message");
    assert_eq!(message.kind, MessageKind::Error);
    assert_eq!(message.text, "Failed to delete path. Please try again later.");
}

#[tokio::test]
async fn test_admin_add_list_and_remove_flow() {
    let state = StubState::new();
    let hits = state.admin_list_hits.clone();
    let (_paths, admins, _dir) = setup(state).await;

    admins
        .add("ada@example.com", Instant::now())
        .await
        .expect("grant failed");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let listed = admins.admins().await.expect("list failed");
    assert_eq!(listed, vec!["ada@example.com".to_string()]);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let message = admins.form_message(Instant::now()).expect("missing message");
    assert_eq!(message.text, "email is added as admin successfully!");

    admins
        .remove("ada@example.com", Instant::now())
        .await
        .expect("revoke failed");
    assert!(admins.admins().await.expect("list failed").is_empty());
    let row = admins
        .row_message("ada@example.com", Instant::now())
        .expect("missing row message");
    assert_eq!(row.text, "email deleted successfully!");
}

#[tokio::test]
async fn test_admin_duplicate_grant_names_the_email() {
    let state = StubState::new();
    state.admins.lock().unwrap().push("ada@example.com".to_string());
    let (_paths, admins, _dir) = setup(state).await;

    let err = admins
        .add("ada@example.com", Instant::now())
        .await
        .expect_err("duplicate grant should fail");
    assert_eq!(err.status(), Some(409));

    let message = admins.form_message(Instant::now()).expect("missing message");
    assert_eq!(
        message.text,
        "Email \"ada@example.com\" already exists as an admin user."
    );
}
