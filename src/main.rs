//! Server binary: config, seeding, background cleanup, axum serve.

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quillboard::config::AppConfig;
use quillboard::seed;
use quillboard::server::{AppState, router};
use quillboard::storage::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("QUILLBOARD_CONFIG") {
        Ok(path) => AppConfig::from_yaml_file(&path)?,
        Err(_) => AppConfig::default(),
    };

    let store = InMemoryStore::new();
    if config.seed {
        seed::seed(&store).await;
    }

    let state = AppState::new(store, &config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = tokio::spawn(state.cleanup.clone().run(shutdown_rx));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("serving")?;

    let _ = shutdown_tx.send(true);
    let _ = cleanup.await;

    Ok(())
}
