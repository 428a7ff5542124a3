use crate::AppState;
use crate::api::error::AppError;
use crate::api::form::ComplaintForm;
use crate::entities::complaints::Complaint;
use crate::models::Scope;
use crate::utils::validation::rating_from_json;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: Complaint,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize, ToSchema)]
pub struct FeedbackRequest {
    /// Integer 1..=5. Numeric strings are accepted.
    #[serde(default)]
    #[schema(value_type = i32)]
    pub rating: serde_json::Value,
    pub comment: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub message: String,
    pub complaint: Complaint,
}

pub(crate) fn attachment_response(path: &str, data: Vec<u8>) -> Response {
    let mime = infer::get(&data)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    let file_name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment");

    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        data,
    )
        .into_response()
}

pub(crate) async fn feedback(
    state: &AppState,
    scope: Scope,
    id: i32,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let rating = rating_from_json(&payload.rating)?;

    let complaint = state
        .complaints
        .submit_feedback(scope, id, rating, payload.comment)
        .await?;

    Ok(Json(FeedbackResponse {
        message: "Feedback submitted successfully".to_string(),
        complaint,
    }))
}

#[utoipa::path(
    get,
    path = "/complaints",
    params(("x-role" = String, Header, description = "Must be `admin`")),
    responses(
        (status = 200, description = "All complaints ordered by id", body = [Complaint]),
        (status = 403, description = "Admin access only")
    ),
    tag = "complaints"
)]
pub async fn list_complaints(
    State(state): State<AppState>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    Ok(Json(state.complaints.list(Scope::Admin).await?))
}

#[utoipa::path(
    get,
    path = "/complaints/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint found", body = Complaint),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn get_complaint(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Complaint>, AppError> {
    Ok(Json(state.complaints.get(Scope::Admin, id).await?))
}

#[utoipa::path(
    post,
    path = "/complaints",
    request_body(content = Object, description = "subject, description, status, type, optional priority, user_id and `attachment` file", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Complaint created", body = Complaint),
        (status = 400, description = "Missing or malformed field")
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    State(state): State<AppState>,
    form: ComplaintForm,
) -> Result<Json<Complaint>, AppError> {
    let (payload, upload) = form.into_new_complaint()?;
    Ok(Json(
        state
            .complaints
            .create(Scope::Admin, payload, upload)
            .await?,
    ))
}

#[utoipa::path(
    put,
    path = "/complaints/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    request_body(content = Object, description = "Any of subject, description, status, type and an `attachment` file", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Complaint updated", body = Complaint),
        (status = 400, description = "No data to update"),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn update_complaint(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: ComplaintForm,
) -> Result<Json<Complaint>, AppError> {
    let (changes, upload) = form.into_admin_changes();
    Ok(Json(
        state
            .complaints
            .update(Scope::Admin, id, changes, upload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/complaints/{id}",
    params(("id" = i32, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint deleted", body = DeletedResponse),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn delete_complaint(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted = state.complaints.delete(Scope::Admin, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/complaints/{id}/attachment",
    params(("id" = i32, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Complaint or attachment not found")
    ),
    tag = "complaints"
)]
pub async fn download_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let (path, data) = state
        .complaints
        .attachments()
        .download(Scope::Admin, id)
        .await?;
    Ok(attachment_response(&path, data))
}

#[utoipa::path(
    delete,
    path = "/complaints/{id}/attachment",
    params(("id" = i32, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Attachment deleted", body = MessageResponse),
        (status = 400, description = "Complaint has no attachment"),
        (status = 404, description = "Complaint not found"),
        (status = 500, description = "Attachment file could not be deleted")
    ),
    tag = "complaints"
)]
pub async fn delete_attachment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .complaints
        .attachments()
        .detach(Scope::Admin, id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Attachment deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/complaints/{id}/feedback",
    params(("id" = i32, Path, description = "Complaint id")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = FeedbackResponse),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Complaint not found")
    ),
    tag = "complaints"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    feedback(&state, Scope::Admin, id, payload).await
}
