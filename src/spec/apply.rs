//! Translation of a [`Specification`] into an executable storage query.
//!
//! [`apply`] pairs a specification with an entity-collection handle and
//! returns a [`SpecQuery`]. Nothing touches the storage layer until the
//! query is forced with [`SpecQuery::count`], [`SpecQuery::to_list`], or
//! [`SpecQuery::page`]. The applier never mutates the specification it was
//! given; it works on a clone.
//!
//! Evaluation order is fixed: filter, then includes (forwarded to the
//! source when the snapshot is loaded), then one stable sort whose
//! comparator consults ascending keys in insertion order followed by
//! descending keys in insertion order.

use std::cmp::Ordering;

use anyhow::Result;
use async_trait::async_trait;

use super::{Include, Specification};

/// A lazily-queryable view of one entity collection in the storage layer.
///
/// `load` materializes a snapshot of the collection, honoring the include
/// selectors the storage layer understands. Translation failures (for
/// example an unknown include selector) are backend errors and propagate
/// unchanged.
#[async_trait]
pub trait EntitySource<E>: Send + Sync {
    async fn load(&self, includes: &[Include]) -> Result<Vec<E>>;
}

/// Build a lazy query from a specification and a collection handle.
pub fn apply<E, S>(source: S, specification: &Specification<E>) -> SpecQuery<E, S>
where
    E: Clone,
    S: EntitySource<E>,
{
    SpecQuery {
        source,
        spec: specification.clone(),
    }
}

/// A not-yet-executed query over one entity collection.
pub struct SpecQuery<E, S> {
    source: S,
    spec: Specification<E>,
}

impl<E, S> SpecQuery<E, S>
where
    E: Clone + Send + Sync,
    S: EntitySource<E>,
{
    /// Number of entities matching the filter.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.run().await?.len())
    }

    /// All matching entities in specification order.
    pub async fn to_list(&self) -> Result<Vec<E>> {
        self.run().await
    }

    /// One page of matching entities. `page` is 1-based.
    pub async fn page(&self, page: usize, limit: usize) -> Result<Vec<E>> {
        let items = self.run().await?;
        let start = page.saturating_sub(1).saturating_mul(limit);
        Ok(items.into_iter().skip(start).take(limit).collect())
    }

    async fn run(&self) -> Result<Vec<E>> {
        let mut items = self.source.load(self.spec.includes()).await?;

        if let Some(filter) = self.spec.filter() {
            items.retain(|entity| filter.matches(entity));
        }

        if !self.spec.ascending_keys().is_empty() || !self.spec.descending_keys().is_empty() {
            items.sort_by(|a, b| self.compare(a, b));
        }

        Ok(items)
    }

    fn compare(&self, a: &E, b: &E) -> Ordering {
        for key in self.spec.ascending_keys() {
            match key.value_of(a).cmp(&key.value_of(b)) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        for key in self.spec.descending_keys() {
            match key.value_of(b).cmp(&key.value_of(a)) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{KeySelector, Predicate, SortValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        group: i64,
    }

    struct Rows(Vec<Row>);

    #[async_trait]
    impl EntitySource<Row> for Rows {
        async fn load(&self, includes: &[Include]) -> Result<Vec<Row>> {
            if let Some(unknown) = includes.iter().find(|i| i.0 != "group") {
                anyhow::bail!("unknown include selector: {}", unknown.0);
            }
            Ok(self.0.clone())
        }
    }

    fn rows() -> Rows {
        Rows(vec![
            Row { id: 3, group: 1 },
            Row { id: 1, group: 2 },
            Row { id: 4, group: 1 },
            Row { id: 2, group: 2 },
        ])
    }

    #[tokio::test]
    async fn filterless_specification_returns_everything() {
        let spec: Specification<Row> = Specification::new();
        let query = apply(rows(), &spec);

        assert_eq!(query.count().await.unwrap(), 4);
        assert_eq!(query.to_list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn filter_restricts_to_matching_entities() {
        let spec = Specification::new()
            .with_filter(Predicate::new("group 1", |r: &Row| r.group == 1));
        let query = apply(rows(), &spec);

        let matched = query.to_list().await.unwrap();
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|r| r.group == 1));
    }

    #[tokio::test]
    async fn ascending_key_yields_non_decreasing_sequence() {
        let spec: Specification<Row> = Specification::new()
            .with_order_asc(KeySelector::new("id", |r: &Row| SortValue::Int(r.id)));

        let ids: Vec<i64> = apply(rows(), &spec)
            .to_list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn descending_key_yields_non_increasing_sequence() {
        let spec: Specification<Row> = Specification::new()
            .with_order_desc(KeySelector::new("id", |r: &Row| SortValue::Int(r.id)));

        let ids: Vec<i64> = apply(rows(), &spec)
            .to_list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, [4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn ascending_block_applies_before_descending_block() {
        let spec: Specification<Row> = Specification::new()
            .with_order_asc(KeySelector::new("group", |r: &Row| SortValue::Int(r.group)))
            .with_order_desc(KeySelector::new("id", |r: &Row| SortValue::Int(r.id)));

        let ids: Vec<i64> = apply(rows(), &spec)
            .to_list()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        // Primary: group ascending. Tie-break: id descending.
        assert_eq!(ids, [4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn pagination_is_one_based() {
        let spec: Specification<Row> = Specification::new()
            .with_order_asc(KeySelector::new("id", |r: &Row| SortValue::Int(r.id)));
        let query = apply(rows(), &spec);

        let first: Vec<i64> = query.page(1, 2).await.unwrap().iter().map(|r| r.id).collect();
        let second: Vec<i64> = query.page(2, 2).await.unwrap().iter().map(|r| r.id).collect();
        let beyond = query.page(3, 2).await.unwrap();

        assert_eq!(first, [1, 2]);
        assert_eq!(second, [3, 4]);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn unknown_include_propagates_as_backend_error() {
        let mut spec: Specification<Row> = Specification::new();
        spec.add_include(Include("owners"));

        let err = apply(rows(), &spec).to_list().await.unwrap_err();
        assert!(err.to_string().contains("unknown include selector"));
    }
}
