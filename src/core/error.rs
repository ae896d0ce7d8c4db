//! Typed error handling for the API surface.
//!
//! Every handler returns [`ApiResult`]; [`ApiError`] knows its HTTP status
//! and a stable error code, and serializes to a JSON [`ErrorResponse`].
//! Specification misuse ([`SpecError`]) is a caller contract violation and
//! maps to 400; storage failures stay opaque and map to 500.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::spec::SpecError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Specification construction/composition misuse.
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Backend failure; details are logged, not returned.
    #[error("storage error")]
    Storage(#[from] anyhow::Error),
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable code for programmatic handling.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Spec(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Spec(_) => "SPEC_ERROR",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Never leak backend details to clients.
            ApiError::Storage(_) => "internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(err) = &self {
            tracing::error!(error = %err, "storage failure");
        }
        let body = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}
