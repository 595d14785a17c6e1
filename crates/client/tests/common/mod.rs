//! In-memory projects backend for exercising the HTTP client.
//!
//! Serves `/api/projects` on an ephemeral `127.0.0.1` port with the same
//! shapes as the real document store: `_id` identifiers, timestamp due
//! dates, and extra bookkeeping fields the client must ignore.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};

/// A request as seen by the backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    projects: Vec<Value>,
    fail_with: Option<StatusCode>,
    requests: Vec<RecordedRequest>,
}

/// Shared backend state. Cloning shares the same store.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    /// Seed a stored record.
    pub fn insert(&self, record: Value) {
        self.inner.lock().unwrap().projects.push(record);
    }

    /// Make every subsequent request fail with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        self.inner.lock().unwrap().fail_with = Some(status);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn stored(&self) -> Vec<Value> {
        self.inner.lock().unwrap().projects.clone()
    }

    /// Record the request and return the injected failure, if any.
    fn record(&self, method: &'static str, path: String, body: Option<Value>) -> Option<Response> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(RecordedRequest { method, path, body });
        inner
            .fail_with
            .map(|status| (status, "backend unavailable").into_response())
    }
}

/// Start the backend and return the collection URL.
pub async fn spawn_backend(backend: MockBackend) -> String {
    let app = Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            put(update_project).delete(delete_project),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend");
    });

    format!("http://{addr}/api/projects")
}

/// A stored record in the backend's wire shape.
pub fn stored_record(id: &str, name: &str, due_date: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "due_date": format!("{due_date}T00:00:00.000Z"),
        "status": status,
        "createdAt": "2024-01-01T09:00:00.000Z",
        "__v": 0
    })
}

fn to_stored(id: String, mut body: Value) -> Value {
    if let Some(due) = body["due_date"].as_str() {
        body["due_date"] = json!(format!("{due}T00:00:00.000Z"));
    }
    body["_id"] = json!(id);
    body["__v"] = json!(0);
    body
}

async fn list_projects(State(backend): State<MockBackend>) -> Response {
    if let Some(failure) = backend.record("GET", "/api/projects".into(), None) {
        return failure;
    }
    let projects = backend.stored();
    Json(projects).into_response()
}

async fn create_project(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if let Some(failure) = backend.record("POST", "/api/projects".into(), Some(body.clone())) {
        return failure;
    }
    let record = to_stored(uuid::Uuid::new_v4().simple().to_string(), body);
    backend.insert(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_project(
    State(backend): State<MockBackend>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/projects/{id}");
    if let Some(failure) = backend.record("PUT", path, Some(body.clone())) {
        return failure;
    }
    let mut inner = backend.inner.lock().unwrap();
    match inner.projects.iter_mut().find(|p| p["_id"] == id.as_str()) {
        Some(existing) => {
            *existing = to_stored(id, body);
            Json(existing.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Project not found"}))).into_response(),
    }
}

async fn delete_project(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    let path = format!("/api/projects/{id}");
    if let Some(failure) = backend.record("DELETE", path, None) {
        return failure;
    }
    let mut inner = backend.inner.lock().unwrap();
    let before = inner.projects.len();
    inner.projects.retain(|p| p["_id"] != id.as_str());
    if inner.projects.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"message": "Project not found"}))).into_response();
    }
    Json(json!({"message": "Project deleted"})).into_response()
}
