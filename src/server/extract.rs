//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AppState;
use crate::auth::Claims;
use crate::core::ApiError;

/// Extracts and validates the bearer token; rejects with 401 when the
/// header is missing, malformed, or the token does not verify.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Author-or-admin check used by mutating post/like/comment handlers.
    pub fn may_modify(&self, owner_id: &str) -> bool {
        self.username() == owner_id || self.is_admin()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected bearer token".to_string()))?;

        let claims = state
            .signer
            .validate(token)
            .map_err(|err| ApiError::Unauthorized(format!("invalid token: {err}")))?;

        Ok(AuthUser(claims))
    }
}
