//! The search index port.
//!
//! The engine's pure logic (parsing, rendering, numeric and prefix
//! enumeration) never touches a backend; only data-dependent child
//! enumeration does, through this narrow trait. Tests double it with a
//! stub, embedded use gets an in-memory implementation, production binds it
//! to a real index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::criterion::Criterion;
use crate::item::CatalogItem;

/// One distinct value of a property and how many matching items carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    /// The distinct value, rendered as text.
    pub value: String,
    /// The number of matching items carrying it.
    pub count: u64,
}

impl ValueCount {
    /// Create a value count.
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        Self { value: value.into(), count }
    }
}

/// Search index error type.
///
/// A failed query must surface as an error, never as an empty result: an
/// empty branch and an unreachable backend are different answers.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The index cannot be reached.
    #[error("search index unavailable: {0}")]
    Unavailable(String),
    /// The index rejected or failed the query.
    #[error("index query failed: {0}")]
    Query(String),
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Read access to the live search index.
///
/// Implementations answer against a read-only snapshot; the engine issues
/// mutually independent queries and never writes.
pub trait SearchIndex: Send + Sync {
    /// Execute a filter and return a page of matching items.
    fn search(&self, criterion: &Criterion, limit: usize) -> IndexResult<Vec<CatalogItem>>;

    /// The minimum and maximum value of a datetime property among matching
    /// items, or `None` when no matching item carries the property.
    fn date_bounds(
        &self,
        criterion: &Criterion,
        property: &str,
    ) -> IndexResult<Option<(DateTime<Utc>, DateTime<Utc>)>>;

    /// The distinct values of a property among matching items, with counts,
    /// sorted by value, at most `limit` of them.
    fn value_counts(
        &self,
        criterion: &Criterion,
        property: &str,
        limit: usize,
    ) -> IndexResult<Vec<ValueCount>>;
}
