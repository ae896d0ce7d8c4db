//! Demo data seeding.

use chrono::{Duration, Utc};
use tracing::info;

use crate::storage::InMemoryStore;

/// Seed a handful of demo posts. No-op when the store already has posts.
pub async fn seed(store: &InMemoryStore) {
    if store.post_count().await > 0 {
        return;
    }

    let now = Utc::now();
    let first = store
        .create_post(
            "seed",
            ".NET and microservices",
            "Discussion about microservices architecture in .NET",
            ".NET",
            now - Duration::days(1),
        )
        .await;
    store
        .create_post(
            "seed",
            "Architecture patterns",
            "Exploring layered vs hexagonal architecture",
            "Architecture",
            now - Duration::days(10),
        )
        .await;
    store
        .create_post("seed", "Other topic", "Non related", "Misc", now - Duration::days(5))
        .await;

    store.add_like(first.id, "alice").await;
    store.add_like(first.id, "bob").await;
    store.add_comment(first.id, "alice", "Great post").await;

    info!(posts = store.post_count().await, "seeded demo data");
}
