//! The backend-executable filter model.
//!
//! A [`Criterion`] is what the engine hands to the search backend to scope a
//! query. Criteria compose with logical AND/OR/NOT; the empty set of
//! constraints is [`Criterion::All`], which matches everything. The
//! [`Criterion::matches`] evaluation backs the in-memory index and keeps the
//! model honest in tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value as JsonValue;

use crate::item::CatalogItem;

/// A search filter over catalog items.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// Match every item.
    All,

    /// Match items satisfying all inner criteria.
    And(Vec<Criterion>),

    /// Match items satisfying any inner criterion.
    Or(Vec<Criterion>),

    /// Match items not satisfying the inner criterion.
    Not(Box<Criterion>),

    /// Match items where the field equals the value.
    Eq {
        /// Field path.
        field: String,
        /// Value to match.
        value: JsonValue,
    },

    /// Match items where the field value (or one of its array elements for
    /// array fields) is in the given set.
    In {
        /// Field path.
        field: String,
        /// Accepted values.
        values: Vec<JsonValue>,
    },

    /// Match items where the numeric field is strictly greater.
    Gt {
        /// Field path.
        field: String,
        /// Exclusive lower bound.
        value: f64,
    },

    /// Match items where the numeric field is greater or equal.
    Gte {
        /// Field path.
        field: String,
        /// Inclusive lower bound.
        value: f64,
    },

    /// Match items where the numeric field is strictly smaller.
    Lt {
        /// Field path.
        field: String,
        /// Exclusive upper bound.
        value: f64,
    },

    /// Match items where the numeric field is smaller or equal.
    Lte {
        /// Field path.
        field: String,
        /// Inclusive upper bound.
        value: f64,
    },

    /// Match items where the string field starts with the prefix.
    StartsWith {
        /// Field path.
        field: String,
        /// Prefix to match.
        prefix: String,
    },

    /// Match items where the string field contains the substring.
    Contains {
        /// Field path.
        field: String,
        /// Substring to find.
        substring: String,
    },

    /// Match items where the field is present and non-null.
    Exists {
        /// Field path.
        field: String,
    },

    /// Match items whose datetime field falls in the half-open interval
    /// `[from, to)`; an absent bound is unbounded on that side.
    DateRange {
        /// Field path.
        field: String,
        /// Inclusive lower bound.
        from: Option<DateTime<Utc>>,
        /// Exclusive upper bound.
        to: Option<DateTime<Utc>>,
    },

    /// Match items whose extent intersects the bounding box
    /// `[min_x, min_y, max_x, max_y]`.
    IntersectsBbox {
        /// The bounding box.
        bbox: [f64; 4],
    },

    /// Match items whose extent intersects the GeoJSON geometry.
    ///
    /// Evaluated in memory against the geometry's bounding box; a real
    /// backend may apply exact intersection.
    IntersectsGeometry {
        /// The GeoJSON geometry.
        geometry: JsonValue,
    },
}

impl Criterion {
    /// The match-everything criterion.
    #[must_use]
    pub const fn all() -> Self {
        Self::All
    }

    /// AND of the given criteria.
    pub fn and(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        Self::And(criteria.into_iter().collect())
    }

    /// OR of the given criteria.
    pub fn or(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        Self::Or(criteria.into_iter().collect())
    }

    /// Negation of a criterion.
    #[must_use]
    pub fn not(criterion: Criterion) -> Self {
        Self::Not(Box::new(criterion))
    }

    /// Equality on a field.
    pub fn eq(field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        Self::Eq { field: field.into(), value: value.into() }
    }

    /// Set membership on a field.
    pub fn in_set<V: Into<JsonValue>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In { field: field.into(), values: values.into_iter().map(Into::into).collect() }
    }

    /// Strictly-greater on a numeric field.
    pub fn gt(field: impl Into<String>, value: impl Into<f64>) -> Self {
        Self::Gt { field: field.into(), value: value.into() }
    }

    /// Greater-or-equal on a numeric field.
    pub fn gte(field: impl Into<String>, value: impl Into<f64>) -> Self {
        Self::Gte { field: field.into(), value: value.into() }
    }

    /// Strictly-smaller on a numeric field.
    pub fn lt(field: impl Into<String>, value: impl Into<f64>) -> Self {
        Self::Lt { field: field.into(), value: value.into() }
    }

    /// Smaller-or-equal on a numeric field.
    pub fn lte(field: impl Into<String>, value: impl Into<f64>) -> Self {
        Self::Lte { field: field.into(), value: value.into() }
    }

    /// Prefix match on a string field.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith { field: field.into(), prefix: prefix.into() }
    }

    /// Substring match on a string field.
    pub fn contains(field: impl Into<String>, substring: impl Into<String>) -> Self {
        Self::Contains { field: field.into(), substring: substring.into() }
    }

    /// Presence of a field.
    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists { field: field.into() }
    }

    /// Half-open datetime interval on a field.
    pub fn date_range(
        field: impl Into<String>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        Self::DateRange { field: field.into(), from, to }
    }

    /// Bounding box intersection.
    #[must_use]
    pub const fn intersects_bbox(bbox: [f64; 4]) -> Self {
        Self::IntersectsBbox { bbox }
    }

    /// Geometry intersection.
    #[must_use]
    pub const fn intersects_geometry(geometry: JsonValue) -> Self {
        Self::IntersectsGeometry { geometry }
    }

    /// Fold the present constraints with AND.
    ///
    /// Absent dimensions are omitted, not treated as match-nothing; the
    /// empty set of constraints is match-everything, and a single constraint
    /// stays unwrapped.
    pub fn and_all(criteria: impl IntoIterator<Item = Option<Criterion>>) -> Self {
        let mut present: Vec<Criterion> = criteria.into_iter().flatten().collect();
        match present.len() {
            0 => Self::All,
            1 => present.remove(0),
            _ => Self::And(present),
        }
    }

    /// Combine this criterion with another using AND.
    #[must_use]
    pub fn and_then(self, other: Criterion) -> Self {
        match self {
            Self::All => other,
            Self::And(mut criteria) => {
                criteria.push(other);
                Self::And(criteria)
            }
            _ => Self::And(vec![self, other]),
        }
    }

    /// Evaluate this criterion against an item.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        match self {
            Self::All => true,

            Self::And(criteria) => criteria.iter().all(|c| c.matches(item)),

            Self::Or(criteria) => criteria.iter().any(|c| c.matches(item)),

            Self::Not(criterion) => !criterion.matches(item),

            Self::Eq { field, value } => {
                item.field(field).is_some_and(|v| values_equal(&v, value))
            }

            Self::In { field, values } => item.field(field).is_some_and(|v| match &v {
                JsonValue::Array(elements) => elements
                    .iter()
                    .any(|element| values.iter().any(|value| values_equal(element, value))),
                _ => values.iter().any(|value| values_equal(&v, value)),
            }),

            Self::Gt { field, value } => {
                numeric_field(item, field).is_some_and(|v| v > *value)
            }

            Self::Gte { field, value } => {
                numeric_field(item, field).is_some_and(|v| v >= *value)
            }

            Self::Lt { field, value } => {
                numeric_field(item, field).is_some_and(|v| v < *value)
            }

            Self::Lte { field, value } => {
                numeric_field(item, field).is_some_and(|v| v <= *value)
            }

            Self::StartsWith { field, prefix } => item
                .field(field)
                .and_then(|v| v.as_str().map(str::to_owned))
                .is_some_and(|s| s.starts_with(prefix.as_str())),

            Self::Contains { field, substring } => item
                .field(field)
                .and_then(|v| v.as_str().map(str::to_owned))
                .is_some_and(|s| s.contains(substring.as_str())),

            Self::Exists { field } => item.field(field).is_some_and(|v| !v.is_null()),

            Self::DateRange { field, from, to } => item
                .field(field)
                .and_then(|v| v.as_str().and_then(parse_datetime))
                .is_some_and(|ts| {
                    from.is_none_or(|from| ts >= from) && to.is_none_or(|to| ts < to)
                }),

            Self::IntersectsBbox { bbox } => {
                item.bbox.is_some_and(|item_bbox| bboxes_intersect(item_bbox, *bbox))
            }

            Self::IntersectsGeometry { geometry } => geometry_bbox(geometry)
                .zip(item.bbox)
                .is_some_and(|(geom_bbox, item_bbox)| bboxes_intersect(item_bbox, geom_bbox)),
        }
    }
}

/// Parse a timestamp as the index stores it: RFC 3339, or a bare
/// `YYYY-MM-DD` date taken at midnight UTC.
#[must_use]
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn numeric_field(item: &CatalogItem, field: &str) -> Option<f64> {
    item.field(field).and_then(|v| v.as_f64())
}

/// Compare two JSON values, with tolerance on floats.
fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(a), JsonValue::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
            _ => a == b,
        },
        _ => a == b,
    }
}

fn bboxes_intersect(a: [f64; 4], b: [f64; 4]) -> bool {
    a[0] <= b[2] && b[0] <= a[2] && a[1] <= b[3] && b[1] <= a[3]
}

/// The bounding box of a GeoJSON geometry, from its raw coordinates.
fn geometry_bbox(geometry: &JsonValue) -> Option<[f64; 4]> {
    let mut bounds: Option<[f64; 4]> = None;
    collect_positions(geometry.get("coordinates")?, &mut bounds);
    bounds
}

fn collect_positions(node: &JsonValue, bounds: &mut Option<[f64; 4]>) {
    let JsonValue::Array(elements) = node else {
        return;
    };
    // A position is an array of at least two numbers; anything else recurses.
    if elements.len() >= 2 && elements.iter().all(JsonValue::is_number) {
        if let (Some(x), Some(y)) = (elements[0].as_f64(), elements[1].as_f64()) {
            *bounds = Some(match bounds {
                Some([min_x, min_y, max_x, max_y]) => {
                    [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)]
                }
                None => [x, y, x, y],
            });
        }
        return;
    }
    for element in elements {
        collect_positions(element, bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn item() -> CatalogItem {
        let mut item = CatalogItem::new("item-1")
            .with_collection("landsat")
            .with_bbox([0.0, 0.0, 10.0, 10.0])
            .with_property("cloud", 12.5)
            .with_property("station", "77A")
            .with_property("acquired", "2020-02-16T12:30:00Z");
        item.geometry = Some(json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]]
        }));
        item
    }

    #[test]
    fn all_matches_everything() {
        assert!(Criterion::all().matches(&item()));
    }

    #[test]
    fn equality_and_sets() {
        assert!(Criterion::eq("station", "77A").matches(&item()));
        assert!(!Criterion::eq("station", "78").matches(&item()));
        assert!(Criterion::in_set("collections", ["landsat", "sentinel"]).matches(&item()));
        assert!(!Criterion::in_set("collections", ["sentinel"]).matches(&item()));
        assert!(Criterion::in_set("id", ["item-1"]).matches(&item()));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(Criterion::gt("cloud", 10.0).matches(&item()));
        assert!(!Criterion::gt("cloud", 12.5).matches(&item()));
        assert!(Criterion::gte("cloud", 12.5).matches(&item()));
        assert!(Criterion::lt("cloud", 20.0).matches(&item()));
        assert!(Criterion::lte("cloud", 12.5).matches(&item()));
        // A missing field never satisfies a bound.
        assert!(!Criterion::lt("missing", 1.0).matches(&item()));
    }

    #[test]
    fn string_matches() {
        assert!(Criterion::starts_with("station", "77").matches(&item()));
        assert!(!Criterion::starts_with("station", "78").matches(&item()));
        assert!(Criterion::contains("station", "7A").matches(&item()));
        assert!(Criterion::exists("station").matches(&item()));
        assert!(!Criterion::exists("missing").matches(&item()));
    }

    #[test]
    fn date_range_is_half_open() {
        let from = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).single();
        let to = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).single();
        assert!(Criterion::date_range("acquired", from, to).matches(&item()));
        assert!(!Criterion::date_range("acquired", to, None).matches(&item()));
        assert!(Criterion::date_range("acquired", None, to).matches(&item()));
        let exact = Utc.with_ymd_and_hms(2020, 2, 16, 12, 30, 0).single();
        assert!(Criterion::date_range("acquired", exact, None).matches(&item()));
        assert!(!Criterion::date_range("acquired", None, exact).matches(&item()));
    }

    #[test]
    fn spatial_matches() {
        assert!(Criterion::intersects_bbox([5.0, 5.0, 15.0, 15.0]).matches(&item()));
        assert!(!Criterion::intersects_bbox([11.0, 11.0, 15.0, 15.0]).matches(&item()));
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[[8.0, 8.0], [12.0, 8.0], [12.0, 12.0], [8.0, 12.0], [8.0, 8.0]]]
        });
        assert!(Criterion::intersects_geometry(geometry).matches(&item()));
    }

    #[test]
    fn and_all_folds_present_constraints() {
        assert_eq!(Criterion::and_all([None, None]), Criterion::All);
        assert_eq!(
            Criterion::and_all([Some(Criterion::eq("station", "77A")), None]),
            Criterion::eq("station", "77A")
        );
        let combined = Criterion::and_all([
            Some(Criterion::eq("station", "77A")),
            Some(Criterion::gt("cloud", 10.0)),
        ]);
        assert!(matches!(&combined, Criterion::And(inner) if inner.len() == 2));
        assert!(combined.matches(&item()));
    }

    #[test]
    fn boolean_composition() {
        assert!(Criterion::not(Criterion::eq("station", "78")).matches(&item()));
        assert!(Criterion::or([
            Criterion::eq("station", "78"),
            Criterion::eq("station", "77A"),
        ])
        .matches(&item()));
        assert!(Criterion::eq("station", "77A")
            .and_then(Criterion::lt("cloud", 20.0))
            .matches(&item()));
    }

    #[test]
    fn timestamp_parsing() {
        assert!(parse_datetime("2020-02-16T12:30:00Z").is_some());
        assert!(parse_datetime("2020-02-16").is_some());
        assert!(parse_datetime("not a date").is_none());
    }
}
