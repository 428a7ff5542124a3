#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use complaints_backend::config::AppConfig;
use complaints_backend::infrastructure::database::run_migrations;
use complaints_backend::services::storage::{BlobStore, LocalBlobStore};
use complaints_backend::{AppState, create_app};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "---------------------------974767299852498929531610575";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    /// Holds the upload directory alive for the duration of the test.
    pub upload_dir: TempDir,
}

pub async fn setup() -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalBlobStore::new(upload_dir.path()));
    setup_with_store(store, upload_dir).await
}

pub async fn setup_with_store(blobs: Arc<dyn BlobStore>, upload_dir: TempDir) -> TestApp {
    let mut config = AppConfig::development();
    config.upload_dir = upload_dir.path().to_path_buf();

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    run_migrations(&db).await.unwrap();

    let state = AppState::new(db, blobs, config);
    TestApp {
        app: create_app(state.clone()),
        state,
        upload_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        into_json(response).await
    }

    pub async fn send_raw(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Number of files currently in the upload directory.
    pub fn stored_blobs(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }

    /// Registers a user and returns its id.
    pub async fn signup(&self, email: &str) -> i64 {
        let (status, json) = self
            .send(json_request(
                "POST",
                "/auth/signup",
                None,
                &serde_json::json!({ "email": email, "password": "secret" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", json);
        json["user"]["id"].as_i64().unwrap()
    }

    /// Files a complaint through the admin API and returns the stored row.
    pub async fn admin_create(&self, fields: &[(&str, &str)]) -> Value {
        let (status, json) = self
            .send(multipart_request("POST", "/complaints", admin(), fields, None))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", json);
        json
    }
}

pub async fn into_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "non-JSON body with status {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )
        })
    };
    (status, json)
}

/// Identity headers for a request.
#[derive(Clone, Copy)]
pub enum Caller {
    Admin,
    User(i64),
    Anonymous,
}

pub fn admin() -> Caller {
    Caller::Admin
}

fn builder(method: &str, uri: &str, caller: Caller) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match caller {
        Caller::Admin => builder.header("x-role", "admin"),
        Caller::User(id) => builder
            .header("x-role", "user")
            .header("x-user-id", id.to_string()),
        Caller::Anonymous => builder,
    }
}

pub fn request(method: &str, uri: &str, caller: Caller) -> Request<Body> {
    builder(method, uri, caller).body(Body::empty()).unwrap()
}

pub fn json_request(
    method: &str,
    uri: &str,
    caller: Option<Caller>,
    body: &Value,
) -> Request<Body> {
    builder(method, uri, caller.unwrap_or(Caller::Anonymous))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `attachment` is `(file name, bytes)` sent as the `attachment` file part.
pub fn multipart_request(
    method: &str,
    uri: &str,
    caller: Caller,
    fields: &[(&str, &str)],
    attachment: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = attachment {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"attachment\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    builder(method, uri, caller)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn complaint_fields<'a>(subject: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("subject", subject),
        ("description", "The package arrived damaged"),
        ("status", "open"),
        ("type", "delivery"),
    ]
}
