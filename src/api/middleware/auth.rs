use crate::api::error::AppError;
use crate::api::identity::identity_from_headers;
use axum::{extract::Request, middleware::Next, response::Response};

/// Admits the request only when the caller claims `x-role: admin`.
///
/// The claim is trusted verbatim; this is an access switch, not authentication.
pub async fn admin_gate(req: Request, next: Next) -> Result<Response, AppError> {
    let identity = identity_from_headers(req.headers());

    if !identity.is_admin() {
        tracing::warn!(
            "⛔ Rejected non-admin request: {} {}",
            req.method(),
            req.uri()
        );
        return Err(AppError::Forbidden("Admin access only".to_string()));
    }

    Ok(next.run(req).await)
}
