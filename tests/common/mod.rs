#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use serde_json::Value;
use tower::ServiceExt;

use gamescores_api::state::AppState;

/// Application state over an in-memory `SQLite` database with migrations applied.
pub async fn test_state() -> AppState {
    let db = gamescores_api::db::connect("sqlite::memory:")
        .await
        .unwrap_or_default();

    Migrator::up(&db, None).await.unwrap_or_default();

    AppState { db }
}

/// Build the app router backed by an in-memory `SQLite` database with migrations.
pub async fn test_app() -> Router {
    app_with(test_state().await)
}

/// Build the app router over existing state, for tests that also touch the database directly.
pub fn app_with(state: AppState) -> Router {
    gamescores_api::routes::router().with_state(state)
}

/// Response pieces the tests assert on.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_default();

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap_or_default(),
    }
}

/// Test helper: send a request without a body.
pub async fn request(app: &Router, method: &str, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap_or_default();
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    request(app, "GET", uri).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    request(app, "DELETE", uri).await
}

/// Test helper: send `body` with an arbitrary content type.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: &str,
    body: &str,
) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_owned()))
        .unwrap_or_default();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    send_raw(app, "POST", uri, "application/json", &body.to_string()).await
}

pub async fn put_json(app: &Router, uri: &str, body: &Value) -> TestResponse {
    send_raw(app, "PUT", uri, "application/json", &body.to_string()).await
}

/// POST a document and return the `Location` of the created resource.
pub async fn create(app: &Router, uri: &str, body: &Value) -> String {
    let response = post_json(app, uri, body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.header(header::LOCATION).to_string()
}
