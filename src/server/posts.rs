//! Handlers for posts, likes, and comments.
//!
//! List endpoints funnel through the specification layer: the handler
//! assembles a `Specification<Post>` (ad-hoc for `GET /api/posts`, a domain
//! specialization for the named feeds), applies it to the posts collection,
//! and materializes a count plus one page.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::{debug, info};
use validator::Validate;

use super::AppState;
use super::dto::{
    CommentCreated, CommentDto, CreateCommentRequest, CreatePostRequest, LikeCreated, PostDto,
    PostListQuery, UpdatePostRequest, ViralQuery,
};
use super::extract::AuthUser;
use crate::core::{ApiError, ApiResult, PageQuery, PaginatedResponse, PaginationMeta};
use crate::model::Post;
use crate::spec::posts::{DEFAULT_VIRAL_MIN_LIKES, created_at_key, dotnet_or_architecture, viral as viral_spec};
use crate::spec::{Predicate, Specification, apply};

fn clamp_paging(page: Option<usize>, limit: Option<usize>) -> (usize, usize) {
    (page.unwrap_or(1).max(1), limit.unwrap_or(10).clamp(1, 100))
}

async fn paginated(
    state: &AppState,
    spec: &Specification<Post>,
    page: usize,
    limit: usize,
) -> ApiResult<PaginatedResponse<PostDto>> {
    let query = apply(state.store.posts(), spec);
    let total = query.count().await?;
    let items = query
        .page(page, limit)
        .await?
        .iter()
        .map(PostDto::from)
        .collect();
    Ok(PaginatedResponse {
        items,
        meta: PaginationMeta::new(page, limit, total),
    })
}

/// `GET /api/posts` — filterable, newest-first, paginated.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PostListQuery>,
) -> ApiResult<Json<PaginatedResponse<PostDto>>> {
    let (page, limit) = clamp_paging(params.page, params.limit);

    let mut filter: Option<Predicate<Post>> = None;
    let mut add = |predicate: Predicate<Post>| {
        filter = Some(match &filter {
            Some(existing) => existing.and(&predicate),
            None => predicate,
        });
    };

    if let Some(category) = params.category.filter(|c| !c.trim().is_empty()) {
        add(Predicate::new(format!("category == {category:?}"), {
            move |post: &Post| post.category == category
        }));
    }
    if let Some(author) = params.author_id.filter(|a| !a.trim().is_empty()) {
        add(Predicate::new(format!("author == {author:?}"), {
            move |post: &Post| post.author_id == author
        }));
    }
    if let Some(from) = params.from {
        add(Predicate::new(format!("created >= {from}"), move |post: &Post| {
            post.created_at >= from
        }));
    }
    if let Some(to) = params.to {
        add(Predicate::new(format!("created <= {to}"), move |post: &Post| {
            post.created_at <= to
        }));
    }
    if let Some(min_likes) = params.min_likes {
        add(Predicate::new(format!("likes >= {min_likes}"), move |post: &Post| {
            post.likes_count() >= min_likes
        }));
    }

    let mut spec = Specification::new().with_order_desc(created_at_key());
    if let Some(filter) = filter {
        spec.set_filter(filter);
    }

    let response = paginated(&state, &spec, page, limit).await?;
    debug!(total = response.meta.total, page, "listed posts");
    Ok(Json(response))
}

/// `GET /api/posts/viral`
pub async fn viral(
    State(state): State<AppState>,
    Query(params): Query<ViralQuery>,
) -> ApiResult<Json<PaginatedResponse<PostDto>>> {
    let (page, limit) = clamp_paging(params.page, params.limit);
    let min_likes = params.min_likes.unwrap_or(DEFAULT_VIRAL_MIN_LIKES);

    let spec = viral_spec(min_likes);
    let response = paginated(&state, &spec, page, limit).await?;
    info!(
        count = response.items.len(),
        min_likes, "retrieved viral posts"
    );
    Ok(Json(response))
}

/// `GET /api/posts/dotnet-architecture`
pub async fn dotnet_architecture(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<PaginatedResponse<PostDto>>> {
    let spec = dotnet_or_architecture()?;
    Ok(Json(paginated(&state, &spec, params.page(), params.limit()).await?))
}

/// `GET /api/posts/{id}`
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PostDto>> {
    let post = state
        .store
        .get_post(id)
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    Ok(Json(PostDto::from(&post)))
}

/// `POST /api/posts`
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostDto>)> {
    body.validate()?;

    let post = state
        .store
        .create_post(
            user.username(),
            &body.title,
            &body.content,
            &body.category,
            chrono::Utc::now(),
        )
        .await;
    info!(post_id = post.id, author = user.username(), "created post");
    Ok((StatusCode::CREATED, Json(PostDto::from(&post))))
}

/// `PUT /api/posts/{id}` — author or admin.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePostRequest>,
) -> ApiResult<StatusCode> {
    let post = state
        .store
        .get_post(id)
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    if !user.may_modify(&post.author_id) {
        return Err(ApiError::Forbidden("only the author or an admin may update a post".to_string()));
    }

    state
        .store
        .update_post(id, body.title.as_deref(), body.content.as_deref(), body.category.as_deref())
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/posts/{id}` — author or admin; cascades likes/comments.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let post = state
        .store
        .get_post(id)
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    if !user.may_modify(&post.author_id) {
        return Err(ApiError::Forbidden("only the author or an admin may delete a post".to_string()));
    }

    state.store.delete_post(id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/posts/{id}/likes`
pub async fn add_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<LikeCreated>)> {
    let like = state
        .store
        .add_like(id, user.username())
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    Ok((StatusCode::CREATED, Json(LikeCreated { like_id: like.id })))
}

/// `DELETE /api/posts/{id}/likes/{like_id}` — liker or admin.
pub async fn delete_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, like_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let like = state
        .store
        .get_like(id, like_id)
        .await
        .ok_or(ApiError::NotFound { what: "like", id: like_id })?;
    if !user.may_modify(&like.user_id) {
        return Err(ApiError::Forbidden("only the liker or an admin may remove a like".to_string()));
    }

    state.store.remove_like(id, like_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/posts/{id}/comments`
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentCreated>)> {
    body.validate()?;

    let comment = state
        .store
        .add_comment(id, user.username(), &body.text)
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    Ok((
        StatusCode::CREATED,
        Json(CommentCreated { comment_id: comment.id }),
    ))
}

/// `DELETE /api/posts/{id}/comments/{comment_id}` — commenter or admin.
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, comment_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let comment = state
        .store
        .get_comment(id, comment_id)
        .await
        .ok_or(ApiError::NotFound { what: "comment", id: comment_id })?;
    if !user.may_modify(&comment.user_id) {
        return Err(ApiError::Forbidden("only the commenter or an admin may remove a comment".to_string()));
    }

    state.store.remove_comment(id, comment_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/posts/{id}/comments` — newest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<CommentDto>>> {
    let mut comments = state
        .store
        .comments_of(id)
        .await
        .ok_or(ApiError::NotFound { what: "post", id })?;
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(comments.iter().map(CommentDto::from).collect()))
}
