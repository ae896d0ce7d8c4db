//! Persistent record types owned by the storage layer.
//!
//! IDs are monotonically increasing `i64` sequence values handed out by the
//! store, so ordering by id descending is newest-first. Relations on `Post`
//! are embedded: the in-memory backend keeps likes and comments inline,
//! which makes cascade deletion inherent and keeps count-based predicates
//! consistent with the rows they count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blog post with its embedded likes and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn comments_count(&self) -> usize {
        self.comments.len()
    }
}

/// A single like on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A refresh token record. Only the SHA-256 hash of the raw token is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: i64,
    pub token_hash: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn refresh_token_expiry_and_revocation() {
        let mut token = RefreshToken {
            id: 1,
            token_hash: "abc".to_string(),
            user_id: "alice".to_string(),
            expires: Utc::now() + Duration::hours(1),
            created_at: Utc::now(),
            revoked_at: None,
        };

        assert!(!token.is_expired());
        assert!(!token.is_revoked());

        token.expires = Utc::now() - Duration::seconds(1);
        assert!(token.is_expired());

        token.revoked_at = Some(Utc::now());
        assert!(token.is_revoked());
    }
}
