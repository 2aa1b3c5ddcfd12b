use super::*;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::domain::ProjectStatus;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct ServerState {
    seen_auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    created_ideas: Arc<Mutex<Vec<String>>>,
}

impl ServerState {
    async fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen_auth_headers.lock().await.push(value);
    }
}

async fn handle_login(Json(credentials): Json<Credentials>) -> impl IntoResponse {
    if credentials.password == "hunter2" {
        (StatusCode::OK, Json(json!({ "token": "abc" })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid credentials" })),
        )
    }
}

async fn handle_register() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is down")
}

async fn handle_list_projects(State(state): State<ServerState>, headers: HeaderMap) -> impl IntoResponse {
    state.record(&headers).await;
    Json(json!([
        {
            "id": 1,
            "project_name": "todo",
            "idea_description": "a todo app",
            "status": "completed",
            "repo_url": "https://github.com/acme/todo"
        }
    ]))
}

async fn handle_create_project(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(request): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    state.record(&headers).await;
    state
        .created_ideas
        .lock()
        .await
        .push(request.idea_description);
    Json(json!({ "project_id": 17 }))
}

async fn handle_status(Path(project_id): Path<i64>) -> impl IntoResponse {
    if project_id == 17 {
        (
            StatusCode::OK,
            Json(json!({ "status": "in_progress", "current_agent": "Architect" })),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no such project" })),
        )
    }
}

async fn spawn_backend() -> Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/register", post(handle_register))
        .route(
            "/api/projects",
            get(handle_list_projects).post(handle_create_project),
        )
        .route("/api/projects/:id/status", get(handle_status))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), state))
}

#[tokio::test]
async fn login_returns_token_and_rejection_in_band() {
    let (server_url, _state) = spawn_backend().await.expect("spawn backend");
    let api = HttpProjectApi::new(&server_url).expect("api");

    let ok = api
        .login(&Credentials::new("alice", "hunter2"))
        .await
        .expect("login");
    assert_eq!(ok.token.as_deref(), Some("abc"));

    let rejected = api
        .login(&Credentials::new("alice", "wrong"))
        .await
        .expect("in-band rejection");
    assert_eq!(rejected.token, None);
    assert_eq!(rejected.error.as_deref(), Some("invalid credentials"));
}

#[tokio::test]
async fn non_json_failure_is_an_error() {
    let (server_url, _state) = spawn_backend().await.expect("spawn backend");
    let api = HttpProjectApi::new(&server_url).expect("api");

    let err = api
        .register(&Credentials::new("bob", "pw"))
        .await
        .expect_err("must fail");
    let api_err = err.downcast_ref::<ApiError>().expect("api error");
    assert_eq!(api_err.status, 500);
    assert_eq!(api_err.message, "database is down");
}

#[tokio::test]
async fn bearer_token_follows_set_token() {
    let (server_url, state) = spawn_backend().await.expect("spawn backend");
    let api = HttpProjectApi::new(&server_url).expect("api");

    api.get_projects().await.expect("anonymous list");
    api.set_token(Some("abc".to_string())).await;
    let projects = api.get_projects().await.expect("list");
    api.set_token(None).await;
    api.get_projects().await.expect("anonymous list");

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].status, ProjectStatus::Completed);
    assert_eq!(
        projects[0].repo_url.as_deref(),
        Some("https://github.com/acme/todo")
    );
    assert_eq!(
        state.seen_auth_headers.lock().await.as_slice(),
        &[None, Some("Bearer abc".to_string()), None]
    );
}

#[tokio::test]
async fn create_project_and_read_status() {
    let (server_url, state) = spawn_backend().await.expect("spawn backend");
    let api = HttpProjectApi::new(&server_url).expect("api");
    api.set_token(Some("abc".to_string())).await;

    let created = api.create_project("a todo app").await.expect("create");
    let project_id = created.project_id.expect("project id");
    assert_eq!(project_id, ProjectId(17));
    assert_eq!(
        state.created_ideas.lock().await.as_slice(),
        &["a todo app".to_string()]
    );

    let report = api.get_project_status(project_id).await.expect("status");
    assert_eq!(report.status, ProjectStatus::InProgress);
    assert_eq!(report.current_agent.as_deref(), Some("Architect"));

    let err = api
        .get_project_status(ProjectId(99))
        .await
        .expect_err("missing project");
    assert!(err.to_string().contains("no such project"), "unexpected error: {err}");
}

#[test]
fn server_url_is_normalized() {
    let api = HttpProjectApi::new("127.0.0.1:8000/").expect("api");
    assert_eq!(api.server_url(), "http://127.0.0.1:8000");
}

#[tokio::test]
async fn unreachable_server_is_described_as_such() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let api = HttpProjectApi::new(&format!("http://{addr}")).expect("api");
    let err = api.get_projects().await.expect_err("must fail");
    assert_eq!(
        crate::error::describe_failure(&err),
        "Server unreachable; check URL/network and retry."
    );
}

async fn spawn_null_list_backend() -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route(
        "/api/projects",
        get(|| async { Json(serde_json::Value::Null) }),
    );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn null_project_list_reads_as_empty() {
    let server_url = spawn_null_list_backend().await.expect("spawn backend");
    let api = HttpProjectApi::new(&server_url).expect("api");

    let projects = api.get_projects().await.expect("list");
    assert!(projects.is_empty());
}
