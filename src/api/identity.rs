use crate::models::{Identity, Role};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use std::convert::Infallible;

/// Role claim checked by the admin gate.
pub const ROLE_HEADER: &str = "x-role";
/// Asserted user id for owner-scoped routes.
pub const USER_ID_HEADER: &str = "x-user-id";

pub fn identity_from_headers(headers: &HeaderMap) -> Identity {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    Identity {
        role: Role::from_claim(header(ROLE_HEADER)),
        user_id: header(USER_ID_HEADER).and_then(|v| v.trim().parse().ok()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(identity_from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLE_HEADER, HeaderValue::from_static("admin"));
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("17"));

        let identity = identity_from_headers(&headers);
        assert!(identity.is_admin());
        assert_eq!(identity.user_id, Some(17));
    }

    #[test]
    fn test_missing_or_garbled_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("abc"));

        let identity = identity_from_headers(&headers);
        assert_eq!(identity.role, Role::User);
        assert_eq!(identity.user_id, None);
    }
}
