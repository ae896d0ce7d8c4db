//! Request and response shapes for the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{Comment, Post};

/// Public projection of a post; relations are reduced to counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: i64,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: usize,
    pub comments_count: usize,
}

impl From<&Post> for PostDto {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            created_at: post.created_at,
            likes_count: post.likes_count(),
            comments_count: post.comments_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    pub id: i64,
    pub user_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Deserialize, Default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeCreated {
    pub like_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentCreated {
    pub comment_id: i64,
}

/// Filters for `GET /api/posts`, combined through the specification layer.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct PostListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub min_likes: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ViralQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub min_likes: Option<usize>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub removed: usize,
}
