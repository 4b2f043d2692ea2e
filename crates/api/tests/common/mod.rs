#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use agrobot_api::config::ServerConfig;
use agrobot_api::router::build_app_router;
use agrobot_api::state::AppState;

pub const BOUNDARY: &str = "agrobot-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given files
/// directory.
pub fn test_config(files_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        files_dir: files_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router, sharing the production middleware
/// stack, with uploads going to `files_dir`.
pub fn build_test_app_with_files(pool: PgPool, files_dir: &Path) -> Router {
    let config = test_config(files_dir);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Build the application router for tests that never touch the files
/// directory.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_files(pool, &std::env::temp_dir().join("agrobot-api-tests"))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn with_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    with_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    with_json(app, Method::PUT, uri, body).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a `multipart/form-data` body made of text fields and an optional
/// `file` part.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, String)],
    file: Option<(&str, Vec<u8>)>,
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a robot through the API and return its id.
pub async fn create_robot(app: Router, name: &str) -> i64 {
    let response = post_json(app, "/api/v1/robots", serde_json::json!({ "name": name })).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Id of the first seeded activity.
pub async fn first_activity(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT id FROM activities ORDER BY id LIMIT 1")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Square plot polygon of half-width `half` degrees around `(lon, lat)`.
pub fn square(lon: f64, lat: f64, half: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Polygon",
        "coordinates": [[
            [lon - half, lat - half],
            [lon + half, lat - half],
            [lon + half, lat + half],
            [lon - half, lat + half],
            [lon - half, lat - half]
        ]]
    })
}

/// A `.traj` document with origin `(lon, lat)` and the given local points.
pub fn traj_file(lon: f64, lat: f64, values: serde_json::Value) -> Vec<u8> {
    serde_json::json!({
        "origin": { "coordinates": [lon, lat, 50.0] },
        "points": { "values": values }
    })
    .to_string()
    .into_bytes()
}
