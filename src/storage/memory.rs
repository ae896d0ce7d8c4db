//! In-memory storage backend.
//!
//! Thread-safe via `tokio::sync::RwLock`; collections are plain hash maps
//! keyed by i64 sequence values, so ids grow monotonically. Likes and
//! comments live inside their post, which makes post deletion cascade by
//! construction. The backend is the demo's stand-in for a database and the
//! fixture layer for every test.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::model::{Comment, Like, Post, RefreshToken};
use crate::spec::{EntitySource, Include};

/// Include selectors the post collection understands.
const POST_INCLUDES: [&str; 2] = ["likes", "comments"];

#[derive(Debug, Default)]
struct StoreInner {
    posts: HashMap<i64, Post>,
    refresh_tokens: HashMap<i64, RefreshToken>,
    post_seq: i64,
    like_seq: i64,
    comment_seq: i64,
    token_seq: i64,
}

impl StoreInner {
    fn next_post_id(&mut self) -> i64 {
        self.post_seq += 1;
        self.post_seq
    }

    fn next_like_id(&mut self) -> i64 {
        self.like_seq += 1;
        self.like_seq
    }

    fn next_comment_id(&mut self) -> i64 {
        self.comment_seq += 1;
        self.comment_seq
    }

    fn next_token_id(&mut self) -> i64 {
        self.token_seq += 1;
        self.token_seq
    }
}

/// In-memory store for posts and refresh tokens.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queryable handle to the posts collection.
    pub fn posts(&self) -> PostCollection {
        PostCollection {
            inner: Arc::clone(&self.inner),
        }
    }

    pub async fn create_post(
        &self,
        author_id: &str,
        title: &str,
        content: &str,
        category: &str,
        created_at: DateTime<Utc>,
    ) -> Post {
        let mut inner = self.inner.write().await;
        let id = inner.next_post_id();
        let post = Post {
            id,
            author_id: author_id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            created_at,
            likes: Vec::new(),
            comments: Vec::new(),
        };
        inner.posts.insert(id, post.clone());
        post
    }

    pub async fn get_post(&self, id: i64) -> Option<Post> {
        self.inner.read().await.posts.get(&id).cloned()
    }

    pub async fn post_count(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    /// Partial update; `None` fields keep their current value.
    pub async fn update_post(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
        category: Option<&str>,
    ) -> Option<Post> {
        let mut inner = self.inner.write().await;
        let post = inner.posts.get_mut(&id)?;
        if let Some(title) = title {
            post.title = title.to_string();
        }
        if let Some(content) = content {
            post.content = content.to_string();
        }
        if let Some(category) = category {
            post.category = category.to_string();
        }
        Some(post.clone())
    }

    /// Delete a post; its likes and comments go with it.
    pub async fn delete_post(&self, id: i64) -> bool {
        self.inner.write().await.posts.remove(&id).is_some()
    }

    pub async fn add_like(&self, post_id: i64, user_id: &str) -> Option<Like> {
        let mut inner = self.inner.write().await;
        let id = inner.next_like_id();
        let post = inner.posts.get_mut(&post_id)?;
        let like = Like {
            id,
            post_id,
            user_id: user_id.to_string(),
        };
        post.likes.push(like.clone());
        Some(like)
    }

    pub async fn get_like(&self, post_id: i64, like_id: i64) -> Option<Like> {
        let inner = self.inner.read().await;
        inner
            .posts
            .get(&post_id)?
            .likes
            .iter()
            .find(|l| l.id == like_id)
            .cloned()
    }

    pub async fn remove_like(&self, post_id: i64, like_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let Some(post) = inner.posts.get_mut(&post_id) else {
            return false;
        };
        let before = post.likes.len();
        post.likes.retain(|l| l.id != like_id);
        post.likes.len() != before
    }

    pub async fn add_comment(&self, post_id: i64, user_id: &str, text: &str) -> Option<Comment> {
        let mut inner = self.inner.write().await;
        let id = inner.next_comment_id();
        let post = inner.posts.get_mut(&post_id)?;
        let comment = Comment {
            id,
            post_id,
            user_id: user_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        post.comments.push(comment.clone());
        Some(comment)
    }

    pub async fn get_comment(&self, post_id: i64, comment_id: i64) -> Option<Comment> {
        let inner = self.inner.read().await;
        inner
            .posts
            .get(&post_id)?
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .cloned()
    }

    pub async fn remove_comment(&self, post_id: i64, comment_id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let Some(post) = inner.posts.get_mut(&post_id) else {
            return false;
        };
        let before = post.comments.len();
        post.comments.retain(|c| c.id != comment_id);
        post.comments.len() != before
    }

    /// Comments of a post, or `None` when the post does not exist.
    pub async fn comments_of(&self, post_id: i64) -> Option<Vec<Comment>> {
        let inner = self.inner.read().await;
        Some(inner.posts.get(&post_id)?.comments.clone())
    }

    pub async fn insert_refresh_token(
        &self,
        token_hash: &str,
        user_id: &str,
        expires: DateTime<Utc>,
    ) -> RefreshToken {
        let mut inner = self.inner.write().await;
        let id = inner.next_token_id();
        let token = RefreshToken {
            id,
            token_hash: token_hash.to_string(),
            user_id: user_id.to_string(),
            expires,
            created_at: Utc::now(),
            revoked_at: None,
        };
        inner.refresh_tokens.insert(id, token.clone());
        token
    }

    pub async fn find_refresh_token(&self, token_hash: &str) -> Option<RefreshToken> {
        let inner = self.inner.read().await;
        inner
            .refresh_tokens
            .values()
            .find(|t| t.token_hash == token_hash)
            .cloned()
    }

    pub async fn revoke_refresh_token(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        match inner.refresh_tokens.get_mut(&id) {
            Some(token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(Utc::now());
                true
            }
            _ => false,
        }
    }

    /// Remove tokens that expired or were revoked at or before `threshold`.
    /// Returns the number of removed records.
    pub async fn sweep_refresh_tokens(&self, threshold: DateTime<Utc>) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.refresh_tokens.len();
        inner.refresh_tokens.retain(|_, t| {
            let expired_long_ago = t.is_expired() && t.expires <= threshold;
            let revoked_long_ago = t.revoked_at.is_some_and(|at| at <= threshold);
            !(expired_long_ago || revoked_long_ago)
        });
        before - inner.refresh_tokens.len()
    }

    pub async fn refresh_token_count(&self) -> usize {
        self.inner.read().await.refresh_tokens.len()
    }
}

/// Lazily-queryable view over the posts collection.
#[derive(Clone)]
pub struct PostCollection {
    inner: Arc<RwLock<StoreInner>>,
}

#[async_trait]
impl EntitySource<Post> for PostCollection {
    async fn load(&self, includes: &[Include]) -> Result<Vec<Post>> {
        // Relations are embedded, so includes are load markers only; an
        // unknown selector is still a translation failure.
        if let Some(unknown) = includes.iter().find(|i| !POST_INCLUDES.contains(&i.0)) {
            bail!("cannot translate include selector {:?} for posts", unknown.0);
        }
        let inner = self.inner.read().await;
        Ok(inner.posts.values().cloned().collect())
    }
}
