//! Complaint routes scoped to the user named in the path. The `x-user-id`
//! header must match that user; anything owned by someone else answers
//! exactly like a missing complaint.

use super::complaints::{
    DeletedResponse, FeedbackRequest, FeedbackResponse, MessageResponse, attachment_response,
    feedback,
};
use crate::AppState;
use crate::api::error::AppError;
use crate::api::form::ComplaintForm;
use crate::entities::complaints::Complaint;
use crate::models::Identity;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};

#[utoipa::path(
    get,
    path = "/users/{user_id}/complaints",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    responses(
        (status = 200, description = "The owner's complaints, newest first", body = [Complaint]),
        (status = 403, description = "Header and path user differ")
    ),
    tag = "user complaints"
)]
pub async fn list_complaints(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<Complaint>>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    Ok(Json(state.complaints.list(scope).await?))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/complaints/{id}",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    responses(
        (status = 200, description = "Complaint found", body = Complaint),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint not found or not yours")
    ),
    tag = "user complaints"
)]
pub async fn get_complaint(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
) -> Result<Json<Complaint>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    Ok(Json(state.complaints.get(scope, id).await?))
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/complaints",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    request_body(content = Object, description = "subject, description, status, type, optional priority and `attachment` file", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Complaint created for the owner", body = Complaint),
        (status = 400, description = "Missing or malformed field"),
        (status = 403, description = "Header and path user differ")
    ),
    tag = "user complaints"
)]
pub async fn create_complaint(
    State(state): State<AppState>,
    identity: Identity,
    Path(user_id): Path<i32>,
    form: ComplaintForm,
) -> Result<Json<Complaint>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    let (payload, upload) = form.into_new_complaint()?;
    Ok(Json(state.complaints.create(scope, payload, upload).await?))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/complaints/{id}",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    request_body(content = Object, description = "Any of subject, description, status, type, priority and an `attachment` file", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Complaint updated", body = Complaint),
        (status = 400, description = "No data to update"),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint not found or not yours")
    ),
    tag = "user complaints"
)]
pub async fn update_complaint(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
    form: ComplaintForm,
) -> Result<Json<Complaint>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    let (changes, upload) = form.into_owner_changes();
    Ok(Json(
        state.complaints.update(scope, id, changes, upload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}/complaints/{id}",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    responses(
        (status = 200, description = "Complaint deleted", body = DeletedResponse),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint not found or not yours")
    ),
    tag = "user complaints"
)]
pub async fn delete_complaint(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
) -> Result<Json<DeletedResponse>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    let deleted = state.complaints.delete(scope, id).await?;
    Ok(Json(DeletedResponse { deleted }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/complaints/{id}/attachment",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint or attachment not found")
    ),
    tag = "user complaints"
)]
pub async fn download_attachment(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
) -> Result<Response, AppError> {
    let scope = identity.owner_scope(user_id)?;
    let (path, data) = state.complaints.attachments().download(scope, id).await?;
    Ok(attachment_response(&path, data))
}

#[utoipa::path(
    delete,
    path = "/users/{user_id}/complaints/{id}/attachment",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    responses(
        (status = 200, description = "Attachment deleted", body = MessageResponse),
        (status = 400, description = "Complaint has no attachment"),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint not found or not yours"),
        (status = 500, description = "Attachment file could not be deleted")
    ),
    tag = "user complaints"
)]
pub async fn delete_attachment(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
) -> Result<Json<MessageResponse>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    state.complaints.attachments().detach(scope, id).await?;
    Ok(Json(MessageResponse {
        message: "Attachment deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/complaints/{id}/feedback",
    params(
        ("user_id" = i32, Path, description = "Owner id"),
        ("id" = i32, Path, description = "Complaint id"),
        ("x-user-id" = i32, Header, description = "Must equal `user_id`")
    ),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback recorded", body = FeedbackResponse),
        (status = 400, description = "Rating out of range"),
        (status = 403, description = "Header and path user differ"),
        (status = 404, description = "Complaint not found or not yours")
    ),
    tag = "user complaints"
)]
pub async fn submit_feedback(
    State(state): State<AppState>,
    identity: Identity,
    Path((user_id, id)): Path<(i32, i32)>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let scope = identity.owner_scope(user_id)?;
    feedback(&state, scope, id, payload).await
}
