//! Core cross-cutting pieces: error taxonomy and pagination helpers.

pub mod error;
pub mod query;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use query::{PageQuery, PaginatedResponse, PaginationMeta};
