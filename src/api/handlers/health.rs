use crate::AppState;
use axum::{Json, extract::State, http::StatusCode};
use bytes::Bytes;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

/// Field name of the throwaway blob written by the health check.
const CHECK_FIELD: &str = "healthcheck";

#[derive(Serialize, ToSchema, Debug)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, `degraded` otherwise.
    pub status: String,
    /// Backend name, or `unreachable`.
    pub database: String,
    /// `writable` when an attachment could be stored and removed again.
    pub attachments: String,
    pub upload_dir: String,
    pub version: String,
}

/// Stores and removes an empty blob. Complaint creation needs both.
async fn attachments_writable(state: &AppState) -> bool {
    let path = match state
        .blobs
        .put(CHECK_FIELD, "check.tmp", Bytes::new())
        .await
    {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Health: attachment write failed: {}", e);
            return false;
        }
    };

    match state.blobs.delete(&path).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Health: attachment delete failed for {}: {}", path, e);
            false
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Database reachable and attachments writable", body = HealthResponse),
        (status = 503, description = "A dependency is unavailable", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.db.ping().await {
        Ok(()) => format!("{:?}", state.db.get_database_backend()).to_lowercase(),
        Err(e) => {
            tracing::warn!("Health: database ping failed: {}", e);
            "unreachable".to_string()
        }
    };
    let writable = attachments_writable(&state).await;
    let healthy = database != "unreachable" && writable;

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            database,
            attachments: if writable { "writable" } else { "unwritable" }.to_string(),
            upload_dir: state.config.upload_dir.display().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

pub async fn welcome() -> &'static str {
    "Welcome to the Complaints API"
}
