//! HTTP server: shared state and router assembly.

pub mod admin;
pub mod auth;
pub mod dto;
pub mod extract;
pub mod posts;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::JwtSigner;
use crate::auth::cleanup::RefreshTokenCleanup;
use crate::auth::tokens::RefreshTokens;
use crate::config::AppConfig;
use crate::storage::InMemoryStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: InMemoryStore,
    pub signer: JwtSigner,
    pub refresh: RefreshTokens,
    pub cleanup: RefreshTokenCleanup,
}

impl AppState {
    pub fn new(store: InMemoryStore, config: &AppConfig) -> Self {
        let signer = JwtSigner::new(
            &config.jwt.secret,
            &config.jwt.issuer,
            config.jwt.access_ttl_hours,
        );
        let refresh = RefreshTokens::new(store.clone(), config.jwt.refresh_ttl_days);
        let cleanup = RefreshTokenCleanup::new(store.clone(), config.cleanup.clone());
        Self {
            store,
            signer,
            refresh,
            cleanup,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/posts", get(posts::list).post(posts::create))
        .route("/api/posts/viral", get(posts::viral))
        .route(
            "/api/posts/dotnet-architecture",
            get(posts::dotnet_architecture),
        )
        .route(
            "/api/posts/{id}",
            get(posts::get_by_id)
                .put(posts::update)
                .delete(posts::delete),
        )
        .route("/api/posts/{id}/likes", post(posts::add_like))
        .route(
            "/api/posts/{id}/likes/{like_id}",
            axum::routing::delete(posts::delete_like),
        )
        .route(
            "/api/posts/{id}/comments",
            get(posts::list_comments).post(posts::add_comment),
        )
        .route(
            "/api/posts/{id}/comments/{comment_id}",
            axum::routing::delete(posts::delete_comment),
        )
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/auth/revoke", post(auth::revoke))
        .route(
            "/api/admin/cleanup-refresh-tokens",
            post(admin::cleanup_refresh_tokens),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
