//! Login and refresh-token handlers.
//!
//! Login is credential-less demo auth: any username (with an optional role)
//! receives a signed access token plus a refresh token. The role claim is
//! granted at login only; a rotated pair carries no role.

use axum::Json;
use axum::extract::State;
use tracing::info;
use validator::Validate;

use super::AppState;
use super::dto::{LoginRequest, RefreshRequest, TokenResponse};
use crate::auth::tokens::RefreshError;
use crate::core::{ApiError, ApiResult};

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    body.validate()?;

    let token = state.signer.issue(&body.username, body.role.as_deref())?;
    let (refresh_token, _) = state.refresh.issue(&body.username).await;

    info!(username = %body.username, role = ?body.role, "issued token pair");
    Ok(Json(TokenResponse {
        token,
        refresh_token,
        username: body.username,
        role: body.role,
    }))
}

/// `POST /api/auth/refresh` — rotate the refresh token and issue a new
/// access token for its user.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let (refresh_token, record) = state.refresh.rotate(&body.refresh_token).await?;
    let token = state.signer.issue(&record.user_id, None)?;

    info!(username = %record.user_id, "rotated refresh token");
    Ok(Json(TokenResponse {
        token,
        refresh_token,
        username: record.user_id,
        role: None,
    }))
}

/// `POST /api/auth/revoke`
pub async fn revoke(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<axum::http::StatusCode> {
    state.refresh.revoke(&body.refresh_token).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
