//! Composable query specifications.
//!
//! A [`Specification`] bundles an optional filter predicate, eager-load
//! markers, and ascending/descending sort keys into a reusable query recipe
//! for one entity type. Specifications are built per logical query, are
//! cheap to clone (predicates and selectors are `Arc`-backed), and are never
//! shared mutably between requests.
//!
//! AND/OR composition operates on filters only: the composed specification
//! starts with empty includes and orderings, and callers re-add ordering
//! explicitly afterward. Composing with an operand that has no filter is a
//! caller error and fails with [`SpecError::MissingFilter`].

pub mod apply;
pub mod posts;
pub mod predicate;

pub use apply::{EntitySource, SpecQuery, apply};
pub use predicate::{Include, KeySelector, Predicate, SortValue};

use thiserror::Error;

/// Caller-misuse errors raised at specification construction/composition
/// time. Never retried; surfaced as contract violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// AND/OR composition requires a filter on both operands.
    #[error("cannot compose specifications: {side} operand has no filter")]
    MissingFilter { side: &'static str },

    /// Category specializations require a non-blank category.
    #[error("category is required")]
    EmptyCategory,
}

/// A reusable filter + include + ordering recipe for querying one entity
/// type.
#[derive(Debug, Clone)]
pub struct Specification<E> {
    filter: Option<Predicate<E>>,
    includes: Vec<Include>,
    order_asc: Vec<KeySelector<E>>,
    order_desc: Vec<KeySelector<E>>,
}

impl<E> Default for Specification<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Specification<E> {
    /// An empty specification: no filter (matches everything), no includes,
    /// no ordering.
    pub fn new() -> Self {
        Self {
            filter: None,
            includes: Vec::new(),
            order_asc: Vec::new(),
            order_desc: Vec::new(),
        }
    }

    /// Set the filter predicate. Replaces any existing filter; the last
    /// write wins and overwriting is not an error.
    pub fn set_filter(&mut self, predicate: Predicate<E>) {
        self.filter = Some(predicate);
    }

    /// Append an eager-load selector. Duplicates are allowed and preserved.
    pub fn add_include(&mut self, include: Include) {
        self.includes.push(include);
    }

    /// Append an ascending sort key. The first key added is the primary
    /// sort; later keys break ties in insertion order.
    pub fn add_order_asc(&mut self, key: KeySelector<E>) {
        self.order_asc.push(key);
    }

    /// Append a descending sort key, applied after all ascending keys.
    pub fn add_order_desc(&mut self, key: KeySelector<E>) {
        self.order_desc.push(key);
    }

    pub fn filter(&self) -> Option<&Predicate<E>> {
        self.filter.as_ref()
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn ascending_keys(&self) -> &[KeySelector<E>] {
        &self.order_asc
    }

    pub fn descending_keys(&self) -> &[KeySelector<E>] {
        &self.order_desc
    }

    /// Builder-style variants used by the domain specializations.
    pub fn with_filter(mut self, predicate: Predicate<E>) -> Self {
        self.set_filter(predicate);
        self
    }

    pub fn with_order_asc(mut self, key: KeySelector<E>) -> Self {
        self.add_order_asc(key);
        self
    }

    pub fn with_order_desc(mut self, key: KeySelector<E>) -> Self {
        self.add_order_desc(key);
        self
    }
}

impl<E: 'static> Specification<E> {
    /// Conjunction of two specifications' filters.
    ///
    /// The result carries only the combined filter; includes and orderings
    /// of both operands are dropped and must be re-added by the caller.
    pub fn and(&self, other: &Self) -> Result<Self, SpecError> {
        let (a, b) = Self::both_filters(self, other)?;
        Ok(Specification::new().with_filter(a.and(b)))
    }

    /// Disjunction of two specifications' filters. Same contract as
    /// [`Specification::and`].
    pub fn or(&self, other: &Self) -> Result<Self, SpecError> {
        let (a, b) = Self::both_filters(self, other)?;
        Ok(Specification::new().with_filter(a.or(b)))
    }

    fn both_filters<'a>(
        left: &'a Self,
        right: &'a Self,
    ) -> Result<(&'a Predicate<E>, &'a Predicate<E>), SpecError> {
        let a = left
            .filter()
            .ok_or(SpecError::MissingFilter { side: "left" })?;
        let b = right
            .filter()
            .ok_or(SpecError::MissingFilter { side: "right" })?;
        Ok((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn over(n: i64) -> Specification<i64> {
        Specification::new().with_filter(Predicate::new(format!("over {n}"), move |v: &i64| *v > n))
    }

    fn under(n: i64) -> Specification<i64> {
        Specification::new()
            .with_filter(Predicate::new(format!("under {n}"), move |v: &i64| *v < n))
    }

    #[test]
    fn filter_last_write_wins() {
        let mut spec: Specification<i64> = Specification::new();
        spec.set_filter(Predicate::new("first", |_: &i64| false));
        spec.set_filter(Predicate::new("second", |_: &i64| true));

        let filter = spec.filter().expect("filter present");
        assert_eq!(filter.label(), "second");
        assert!(filter.matches(&0));
    }

    #[test]
    fn includes_preserve_order_and_duplicates() {
        let mut spec: Specification<i64> = Specification::new();
        spec.add_include(Include("likes"));
        spec.add_include(Include("comments"));
        spec.add_include(Include("likes"));

        let names: Vec<&str> = spec.includes().iter().map(|i| i.0).collect();
        assert_eq!(names, ["likes", "comments", "likes"]);
    }

    #[test]
    fn and_matches_intersection() {
        let spec = over(10).and(&under(20)).expect("both have filters");
        let filter = spec.filter().expect("composed filter");

        assert!(filter.matches(&15));
        assert!(!filter.matches(&5));
        assert!(!filter.matches(&25));
    }

    #[test]
    fn or_matches_union() {
        let spec = under(10).or(&over(20)).expect("both have filters");
        let filter = spec.filter().expect("composed filter");

        assert!(filter.matches(&5));
        assert!(filter.matches(&25));
        assert!(!filter.matches(&15));
    }

    #[test]
    fn composition_requires_filters_on_both_sides() {
        let filtered = over(10);
        let empty: Specification<i64> = Specification::new();

        assert_eq!(
            empty.and(&filtered).unwrap_err(),
            SpecError::MissingFilter { side: "left" }
        );
        assert_eq!(
            filtered.or(&empty).unwrap_err(),
            SpecError::MissingFilter { side: "right" }
        );
    }

    #[test]
    fn composition_drops_includes_and_orderings() {
        let mut a = over(10);
        a.add_include(Include("likes"));
        a.add_order_asc(KeySelector::new("identity", |v: &i64| SortValue::Int(*v)));

        let mut b = under(20);
        b.add_order_desc(KeySelector::new("identity", |v: &i64| SortValue::Int(*v)));

        let composed = a.and(&b).expect("both have filters");
        assert!(composed.includes().is_empty());
        assert!(composed.ascending_keys().is_empty());
        assert!(composed.descending_keys().is_empty());
    }

    #[test]
    fn composition_is_commutative_on_matching_sets() {
        let values = [-3_i64, 5, 12, 18, 25];
        let ab = over(10).and(&under(20)).expect("filters");
        let ba = under(20).and(&over(10)).expect("filters");

        for v in values {
            assert_eq!(
                ab.filter().expect("filter").matches(&v),
                ba.filter().expect("filter").matches(&v),
            );
        }
    }
}
