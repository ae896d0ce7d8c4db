//! Predicate and sort-key building blocks for specifications.
//!
//! A [`Predicate`] is a labeled boolean test over one entity. The label is
//! carried for logging and `Debug` output only; matching is done by the
//! wrapped closure, so predicates run directly in-memory and combine with
//! plain boolean logic.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

/// A named, reusable boolean condition over an entity.
#[derive(Clone)]
pub struct Predicate<E: ?Sized> {
    label: String,
    test: Arc<dyn Fn(&E) -> bool + Send + Sync>,
}

impl<E> Predicate<E> {
    /// Create a predicate from a label and a test closure.
    pub fn new(label: impl Into<String>, test: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Evaluate the predicate against one entity.
    pub fn matches(&self, entity: &E) -> bool {
        (self.test)(entity)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Logical conjunction: matches only entities matching both operands.
    pub fn and(&self, other: &Self) -> Self
    where
        E: 'static,
    {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        Self {
            label: format!("({} AND {})", self.label, other.label),
            test: Arc::new(move |entity| a(entity) && b(entity)),
        }
    }

    /// Logical disjunction: matches entities matching either operand.
    pub fn or(&self, other: &Self) -> Self
    where
        E: 'static,
    {
        let (a, b) = (Arc::clone(&self.test), Arc::clone(&other.test));
        Self {
            label: format!("({} OR {})", self.label, other.label),
            test: Arc::new(move |entity| a(entity) || b(entity)),
        }
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.label).finish()
    }
}

/// Comparable value a sort key extracts from an entity.
///
/// Every selector for a given key yields the same variant, so the
/// cross-variant ordering (by variant declaration) is never exercised in
/// practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(i64),
    Time(DateTime<Utc>),
    Text(String),
}

/// A labeled sort-key selector.
#[derive(Clone)]
pub struct KeySelector<E: ?Sized> {
    label: String,
    key: Arc<dyn Fn(&E) -> SortValue + Send + Sync>,
}

impl<E> KeySelector<E> {
    pub fn new(
        label: impl Into<String>,
        key: impl Fn(&E) -> SortValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            key: Arc::new(key),
        }
    }

    /// Extract the sort value for one entity.
    pub fn value_of(&self, entity: &E) -> SortValue {
        (self.key)(entity)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<E> fmt::Debug for KeySelector<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeySelector").field(&self.label).finish()
    }
}

/// A directive to eagerly load a related field/collection.
///
/// Interpreted by the storage layer; an unrecognized selector surfaces as a
/// backend error when the query is materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include(pub &'static str);
