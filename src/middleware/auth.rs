//! Authentication middleware
//!
//! Resolves the bearer token on each request into an [`AuthContext`]. Handlers
//! opt in by taking a [`CurrentUser`] argument; `/health` does not.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use tracing::debug;

use crate::http::AppState;
use crate::services::AuthContext;
use crate::utils::errors::HotelConsoleError;

/// The authenticated caller of the current request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthContext);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = HotelConsoleError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or_else(|| {
            HotelConsoleError::Authentication("missing or invalid bearer token".to_string())
        })?;

        let ctx = state.services.auth_service.authenticate(token).await?;
        debug!(user_id = %ctx.user_id, role = %ctx.role, path = %parts.uri.path(), "Request authenticated");

        Ok(Self(ctx))
    }
}

/// Bearer token from the Authorization header, if one is present
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extracts_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
    }

    #[test]
    fn test_rejects_other_schemes_and_blanks() {
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer   ")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
