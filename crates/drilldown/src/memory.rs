//! An in-memory search index.
//!
//! Evaluates criteria directly against a vector of items. Good enough for
//! small embedded catalogs and for exercising the engine end-to-end without
//! a running backend; the aggregations answer exactly what the port
//! contract promises (real min/max bounds, sorted distinct values).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use drilldown_query::criterion::parse_datetime;
use drilldown_query::{CatalogItem, Criterion, IndexResult, SearchIndex, ValueCount};
use serde_json::Value as JsonValue;

/// A [`SearchIndex`] over an in-memory item collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    items: Vec<CatalogItem>,
}

impl MemoryIndex {
    /// Build an index over the given items.
    #[must_use]
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// The number of indexed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn matching<'a>(&'a self, criterion: &'a Criterion) -> impl Iterator<Item = &'a CatalogItem> {
        self.items.iter().filter(move |item| criterion.matches(item))
    }
}

/// Render a property value the way the backend reports distinct values.
fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SearchIndex for MemoryIndex {
    fn search(&self, criterion: &Criterion, limit: usize) -> IndexResult<Vec<CatalogItem>> {
        Ok(self.matching(criterion).take(limit).cloned().collect())
    }

    fn date_bounds(
        &self,
        criterion: &Criterion,
        property: &str,
    ) -> IndexResult<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for item in self.matching(criterion) {
            let Some(ts) = item.property(property).and_then(|v| v.as_str()).and_then(parse_datetime)
            else {
                continue;
            };
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(ts), max.max(ts)),
                None => (ts, ts),
            });
        }
        Ok(bounds)
    }

    fn value_counts(
        &self,
        criterion: &Criterion,
        property: &str,
        limit: usize,
    ) -> IndexResult<Vec<ValueCount>> {
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for item in self.matching(criterion) {
            if let Some(value) = item.property(property) {
                *counts.entry(value_text(value)).or_insert(0) += 1;
            }
        }
        Ok(counts
            .into_iter()
            .take(limit)
            .map(|(value, count)| ValueCount::new(value, count))
            .collect())
    }
}
