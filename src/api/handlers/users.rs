use super::auth::UserResponse;
use crate::api::error::AppError;
use crate::entities::{prelude::*, users};
use axum::{Json, extract::State};
use sea_orm::{EntityTrait, QueryOrder};

#[utoipa::path(
    get,
    path = "/users",
    params(("x-role" = String, Header, description = "Must be `admin`")),
    responses(
        (status = 200, description = "All users ordered by id, without credentials", body = [UserResponse]),
        (status = 403, description = "Admin access only")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = Users::find()
        .order_by_asc(users::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
