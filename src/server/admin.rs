//! Administrative endpoints.

use axum::Json;
use axum::extract::State;

use super::AppState;
use super::dto::CleanupResponse;
use super::extract::AuthUser;
use crate::core::{ApiError, ApiResult};

/// `POST /api/admin/cleanup-refresh-tokens` — admin role required.
pub async fn cleanup_refresh_tokens(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<CleanupResponse>> {
    if !user.is_admin() {
        return Err(ApiError::Forbidden("admin role required".to_string()));
    }

    let removed = state.cleanup.run_once().await;
    Ok(Json(CleanupResponse { removed }))
}
