pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers::{auth, complaints, health, user_complaints, users};
use crate::config::AppConfig;
use crate::services::complaint_service::ComplaintService;
use crate::services::storage::BlobStore;
use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::health::health_check,
        api::handlers::users::list_users,
        api::handlers::complaints::list_complaints,
        api::handlers::complaints::get_complaint,
        api::handlers::complaints::create_complaint,
        api::handlers::complaints::update_complaint,
        api::handlers::complaints::delete_complaint,
        api::handlers::complaints::download_attachment,
        api::handlers::complaints::delete_attachment,
        api::handlers::complaints::submit_feedback,
        api::handlers::user_complaints::list_complaints,
        api::handlers::user_complaints::get_complaint,
        api::handlers::user_complaints::create_complaint,
        api::handlers::user_complaints::update_complaint,
        api::handlers::user_complaints::delete_complaint,
        api::handlers::user_complaints::download_attachment,
        api::handlers::user_complaints::delete_attachment,
        api::handlers::user_complaints::submit_feedback,
    ),
    components(
        schemas(
            entities::complaints::Model,
            api::handlers::auth::SignupRequest,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::UserResponse,
            api::handlers::auth::AuthResponse,
            api::handlers::complaints::DeletedResponse,
            api::handlers::complaints::MessageResponse,
            api::handlers::complaints::FeedbackRequest,
            api::handlers::complaints::FeedbackResponse,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "complaints", description = "Admin complaint management (x-role: admin)"),
        (name = "user complaints", description = "Complaints scoped to the x-user-id owner"),
        (name = "users", description = "User directory (x-role: admin)"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blobs: Arc<dyn BlobStore>,
    pub complaints: Arc<ComplaintService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, blobs: Arc<dyn BlobStore>, config: AppConfig) -> Self {
        Self {
            complaints: Arc::new(ComplaintService::new(db.clone(), blobs.clone())),
            db,
            blobs,
            config,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    // Role Gate: route_layer so unmatched paths still answer 404
    let admin: Router<AppState> = Router::new()
        .route(
            "/complaints",
            get(complaints::list_complaints).post(complaints::create_complaint),
        )
        .route(
            "/complaints/:id",
            get(complaints::get_complaint)
                .put(complaints::update_complaint)
                .delete(complaints::delete_complaint),
        )
        .route(
            "/complaints/:id/attachment",
            get(complaints::download_attachment).delete(complaints::delete_attachment),
        )
        .route("/complaints/:id/feedback", put(complaints::submit_feedback))
        .route("/users", get(users::list_users))
        .route_layer(from_fn(api::middleware::auth::admin_gate));

    let owner: Router<AppState> = Router::new()
        .route(
            "/users/:user_id/complaints",
            get(user_complaints::list_complaints).post(user_complaints::create_complaint),
        )
        .route(
            "/users/:user_id/complaints/:id",
            get(user_complaints::get_complaint)
                .put(user_complaints::update_complaint)
                .delete(user_complaints::delete_complaint),
        )
        .route(
            "/users/:user_id/complaints/:id/attachment",
            get(user_complaints::download_attachment).delete(user_complaints::delete_attachment),
        )
        .route(
            "/users/:user_id/complaints/:id/feedback",
            put(user_complaints::submit_feedback),
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .merge(admin)
        .merge(owner)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_size,
        ))
        .with_state(state)
}
