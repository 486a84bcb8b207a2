//! Search request inputs, one optional slot per dimension.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A datetime interval; either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateInterval {
    /// Inclusive lower bound.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub to: Option<DateTime<Utc>>,
}

impl DateInterval {
    /// An interval with both bounds.
    #[must_use]
    pub const fn closed(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from: Some(from), to: Some(to) }
    }

    /// An interval open above.
    #[must_use]
    pub const fn since(from: DateTime<Utc>) -> Self {
        Self { from: Some(from), to: None }
    }

    /// An interval open below.
    #[must_use]
    pub const fn until(to: DateTime<Utc>) -> Self {
        Self { from: None, to: Some(to) }
    }
}

/// Field selection: which properties must be present or absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldSelection {
    /// Properties that must exist.
    pub includes: Vec<String>,
    /// Properties that must not exist.
    pub excludes: Vec<String>,
}

/// Constraints on a string property.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StringQuery {
    /// Exact match.
    pub eq: Option<String>,
    /// Prefix match.
    pub starts_with: Option<String>,
    /// Substring match.
    pub contains: Option<String>,
    /// Set membership.
    pub any_of: Option<Vec<String>>,
}

/// Constraints on a numeric property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberQuery {
    /// Exact match.
    pub eq: Option<f64>,
    /// Strictly greater.
    pub gt: Option<f64>,
    /// Greater or equal.
    pub gte: Option<f64>,
    /// Strictly smaller.
    pub lt: Option<f64>,
    /// Smaller or equal.
    pub lte: Option<f64>,
    /// Set membership.
    pub any_of: Option<Vec<f64>>,
}

/// Constraints on a datetime property, half-open `[gte, lt)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatetimeQuery {
    /// Inclusive lower bound.
    pub gte: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub lt: Option<DateTime<Utc>>,
}

/// Constraints on a boolean property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoolQuery {
    /// Exact match.
    pub eq: Option<bool>,
}

/// Per-property constraints, typed by property kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryObject {
    /// String constraints.
    String(StringQuery),
    /// Numeric constraints.
    Number(NumberQuery),
    /// Datetime constraints.
    Datetime(DatetimeQuery),
    /// Boolean constraints.
    Bool(BoolQuery),
}

impl QueryObject {
    /// Exact string match.
    pub fn string_eq(value: impl Into<String>) -> Self {
        Self::String(StringQuery { eq: Some(value.into()), ..StringQuery::default() })
    }

    /// String prefix match.
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self::String(StringQuery { starts_with: Some(prefix.into()), ..StringQuery::default() })
    }

    /// Exact number match.
    #[must_use]
    pub fn number_eq(value: f64) -> Self {
        Self::Number(NumberQuery { eq: Some(value), ..NumberQuery::default() })
    }

    /// Number strictly below a bound.
    #[must_use]
    pub fn number_lt(value: f64) -> Self {
        Self::Number(NumberQuery { lt: Some(value), ..NumberQuery::default() })
    }

    /// Number strictly above a bound.
    #[must_use]
    pub fn number_gt(value: f64) -> Self {
        Self::Number(NumberQuery { gt: Some(value), ..NumberQuery::default() })
    }

    /// Number within an inclusive interval.
    #[must_use]
    pub fn number_between(gte: f64, lte: f64) -> Self {
        Self::Number(NumberQuery { gte: Some(gte), lte: Some(lte), ..NumberQuery::default() })
    }

    /// Datetime within a half-open interval.
    #[must_use]
    pub const fn datetime_range(gte: DateTime<Utc>, lt: DateTime<Utc>) -> Self {
        Self::Datetime(DatetimeQuery { gte: Some(gte), lt: Some(lt) })
    }

    /// Exact boolean match.
    #[must_use]
    pub const fn bool_eq(value: bool) -> Self {
        Self::Bool(BoolQuery { eq: Some(value) })
    }
}

/// The per-dimension inputs of an item search.
///
/// Every dimension is optional; a default request means "everything".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Bounding box `[min_x, min_y, max_x, max_y]`.
    pub bbox: Option<[f64; 4]>,
    /// Datetime interval on the catalog's datetime property.
    pub datetime: Option<DateInterval>,
    /// Item identifiers to select.
    pub ids: Option<Vec<String>>,
    /// Stored collections to search within.
    pub collections: Option<Vec<String>>,
    /// GeoJSON geometry the items must intersect.
    pub intersects: Option<JsonValue>,
    /// Properties that must be present/absent.
    pub fields: Option<FieldSelection>,
    /// Per-property constraints.
    pub query: BTreeMap<String, QueryObject>,
}

impl SearchRequest {
    /// The unconstrained request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounding box.
    #[must_use]
    pub const fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the datetime interval.
    #[must_use]
    pub const fn with_datetime(mut self, interval: DateInterval) -> Self {
        self.datetime = Some(interval);
        self
    }

    /// Select item identifiers.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict to stored collections.
    #[must_use]
    pub fn with_collections(
        mut self,
        collections: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.collections = Some(collections.into_iter().map(Into::into).collect());
        self
    }

    /// Add a per-property constraint.
    #[must_use]
    pub fn with_query(mut self, property: impl Into<String>, object: QueryObject) -> Self {
        self.query.insert(property.into(), object);
        self
    }
}
