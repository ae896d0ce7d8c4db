//! Scheduled sweep of stale refresh tokens.
//!
//! Runs every `interval_minutes` and removes tokens that expired or were
//! revoked more than `retention_days` ago. The admin endpoint reuses
//! [`RefreshTokenCleanup::run_once`] for manual sweeps.

use chrono::{Duration, Utc};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::storage::InMemoryStore;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Minutes between sweeps; minimum 1.
    pub interval_minutes: u64,
    /// Remove tokens expired/revoked longer than this many days ago;
    /// minimum 1.
    pub retention_days: i64,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            retention_days: 7,
        }
    }
}

/// Background maintenance task for the refresh-token collection.
#[derive(Clone)]
pub struct RefreshTokenCleanup {
    store: InMemoryStore,
    options: CleanupOptions,
}

impl RefreshTokenCleanup {
    pub fn new(store: InMemoryStore, options: CleanupOptions) -> Self {
        Self { store, options }
    }

    /// One sweep; returns the number of removed tokens.
    pub async fn run_once(&self) -> usize {
        let retention = Duration::days(self.options.retention_days.max(1));
        let removed = self.store.sweep_refresh_tokens(Utc::now() - retention).await;
        if removed == 0 {
            debug!("no stale refresh tokens to remove");
        } else {
            info!(removed, "removed stale refresh tokens");
        }
        removed
    }

    /// Sweep on an interval until `shutdown` fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let minutes = self.options.interval_minutes.max(1);
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(minutes * 60));
        // The first tick completes immediately; consume it so the first
        // sweep happens one interval after startup.
        ticker.tick().await;

        info!(
            interval_minutes = minutes,
            retention_days = self.options.retention_days,
            "refresh token cleanup started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("refresh token cleanup stopping");
    }
}
