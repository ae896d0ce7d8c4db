//! Domain specializations over [`Post`].
//!
//! Each function is a fixed recipe assembled from predicates and sort keys;
//! all are state-free and constructed per call. The composed recipes
//! (`high_engagement_recent`, `dotnet_or_architecture`) re-add their
//! ordering after composition, since AND/OR keeps only the combined filter.

use chrono::{Duration, Utc};

use super::{KeySelector, Predicate, SortValue, SpecError, Specification};
use crate::model::Post;

pub const DEFAULT_RECENT_DAYS: i64 = 7;
pub const DEFAULT_HIGH_ENGAGEMENT_MIN_LIKES: usize = 100;
pub const DEFAULT_HIGH_ENGAGEMENT_MIN_COMMENTS: usize = 30;
pub const DEFAULT_VIRAL_MIN_LIKES: usize = 150;

/// Posts in exactly the given category. Fails fast on a blank category.
pub fn by_category(category: &str) -> Result<Specification<Post>, SpecError> {
    if category.trim().is_empty() {
        return Err(SpecError::EmptyCategory);
    }
    let wanted = category.to_string();
    Ok(Specification::new().with_filter(Predicate::new(
        format!("category == {category:?}"),
        move |post: &Post| post.category == wanted,
    )))
}

/// Posts created within the last `days_back` days, newest first.
pub fn recent(days_back: i64) -> Specification<Post> {
    let cutoff = Utc::now() - Duration::days(days_back);
    Specification::new()
        .with_filter(Predicate::new(
            format!("created within {days_back} days"),
            move |post: &Post| post.created_at >= cutoff,
        ))
        .with_order_desc(created_at_key())
}

/// Posts with at least `min_likes` likes and `min_comments` comments.
pub fn high_engagement(min_likes: usize, min_comments: usize) -> Specification<Post> {
    Specification::new().with_filter(Predicate::new(
        format!("likes >= {min_likes} AND comments >= {min_comments}"),
        move |post: &Post| {
            post.likes_count() >= min_likes && post.comments_count() >= min_comments
        },
    ))
}

/// Recent AND high-engagement posts, ordered by total engagement
/// (likes + comments) descending.
pub fn high_engagement_recent(
    days_back: i64,
    min_likes: usize,
    min_comments: usize,
) -> Result<Specification<Post>, SpecError> {
    let combined = recent(days_back).and(&high_engagement(min_likes, min_comments))?;
    Ok(combined.with_order_desc(KeySelector::new("likes + comments", |post: &Post| {
        SortValue::Int((post.likes_count() + post.comments_count()) as i64)
    })))
}

/// Posts with at least `min_likes` likes, most-liked first.
pub fn viral(min_likes: usize) -> Specification<Post> {
    Specification::new()
        .with_filter(Predicate::new(
            format!("likes >= {min_likes}"),
            move |post: &Post| post.likes_count() >= min_likes,
        ))
        .with_order_desc(KeySelector::new("likes", |post: &Post| {
            SortValue::Int(post.likes_count() as i64)
        }))
}

/// Posts in the ".NET" or "Architecture" category, newest id first.
pub fn dotnet_or_architecture() -> Result<Specification<Post>, SpecError> {
    let combined = by_category(".NET")?.or(&by_category("Architecture")?)?;
    Ok(combined.with_order_desc(id_key()))
}

pub fn created_at_key() -> KeySelector<Post> {
    KeySelector::new("created_at", |post: &Post| SortValue::Time(post.created_at))
}

pub fn id_key() -> KeySelector<Post> {
    KeySelector::new("id", |post: &Post| SortValue::Int(post.id))
}
