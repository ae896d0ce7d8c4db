//! Refresh-token lifecycle: issue, rotate, revoke.
//!
//! Raw tokens are random and handed to the client once; only their SHA-256
//! hash is stored. Rotation revokes the presented record and issues a fresh
//! one, so a replayed token fails on the next use.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::model::RefreshToken;
use crate::storage::InMemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("unknown refresh token")]
    Unknown,
    #[error("refresh token expired")]
    Expired,
    #[error("refresh token revoked")]
    Revoked,
}

/// Issues and rotates refresh tokens against the store.
#[derive(Clone)]
pub struct RefreshTokens {
    store: InMemoryStore,
    ttl: Duration,
}

impl RefreshTokens {
    pub fn new(store: InMemoryStore, ttl_days: i64) -> Self {
        Self {
            store,
            ttl: Duration::days(ttl_days),
        }
    }

    /// Issue a new refresh token; returns the raw secret and the stored
    /// record.
    pub async fn issue(&self, user_id: &str) -> (String, RefreshToken) {
        let raw = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let record = self
            .store
            .insert_refresh_token(&hash_token(&raw), user_id, Utc::now() + self.ttl)
            .await;
        (raw, record)
    }

    /// Rotate a presented raw token: revoke its record and issue a
    /// replacement for the same user.
    ///
    /// The revocation is the single-use gate: when two rotations race on
    /// the same token, only the one that wins the revoke mints a successor.
    pub async fn rotate(&self, raw: &str) -> Result<(String, RefreshToken), RefreshError> {
        let current = self.lookup_usable(raw).await?;
        if !self.store.revoke_refresh_token(current.id).await {
            return Err(RefreshError::Revoked);
        }
        Ok(self.issue(&current.user_id).await)
    }

    /// Revoke a presented raw token.
    pub async fn revoke(&self, raw: &str) -> Result<(), RefreshError> {
        let current = self.lookup_usable(raw).await?;
        if !self.store.revoke_refresh_token(current.id).await {
            return Err(RefreshError::Revoked);
        }
        Ok(())
    }

    async fn lookup_usable(&self, raw: &str) -> Result<RefreshToken, RefreshError> {
        let token = self
            .store
            .find_refresh_token(&hash_token(raw))
            .await
            .ok_or(RefreshError::Unknown)?;
        if token.is_revoked() {
            return Err(RefreshError::Revoked);
        }
        if token.is_expired() {
            return Err(RefreshError::Expired);
        }
        Ok(token)
    }
}

fn hash_token(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    format!("{digest:x}")
}
