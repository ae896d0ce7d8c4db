//! # quillboard
//!
//! A demo blog/social-media API built around a composable query
//! specification layer.
//!
//! The interesting part lives in [`spec`]: a [`spec::Specification`]
//! bundles a filter predicate, eager-load markers, and sort keys into a
//! reusable recipe; recipes compose with AND/OR on their filters and are
//! translated into lazy storage queries by [`spec::apply`]. Everything
//! else — axum handlers, the in-memory store, JWT auth with rotating
//! refresh tokens, the background token sweep — is the demo application
//! around that mechanism.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use quillboard::prelude::*;
//!
//! let store = InMemoryStore::new();
//! let spec = quillboard::spec::posts::viral(150);
//! let posts = apply(store.posts(), &spec).to_list().await?;
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod model;
pub mod seed;
pub mod server;
pub mod spec;
pub mod storage;

/// Re-exports of commonly used types.
pub mod prelude {
    pub use crate::auth::{Claims, JwtSigner};
    pub use crate::config::AppConfig;
    pub use crate::core::{ApiError, ApiResult, PaginatedResponse, PaginationMeta};
    pub use crate::model::{Comment, Like, Post, RefreshToken};
    pub use crate::server::{AppState, router};
    pub use crate::spec::{
        EntitySource, Include, KeySelector, Predicate, SortValue, SpecError, SpecQuery,
        Specification, apply,
    };
    pub use crate::storage::InMemoryStore;
}
