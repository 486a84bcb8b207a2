//! Per-dimension criterion builders and their AND fold.
//!
//! Each builder is independently pluggable and returns `None` when its
//! dimension is unset, so absent dimensions are omitted rather than treated
//! as match-nothing. [`build_criterion`] folds whatever is present with
//! logical AND (commutative and associative, so composition order never
//! changes the result) and yields [`Criterion::All`] for the empty request.

use drilldown_core::Property;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::criterion::Criterion;
use crate::request::{
    DateInterval, FieldSelection, QueryObject, SearchRequest,
};

/// Build the combined criterion for a search request.
#[must_use]
pub fn build_criterion(properties: &[Property], request: &SearchRequest) -> Criterion {
    Criterion::and_all([
        bbox_criterion(request.bbox),
        collections_criterion(request.collections.as_deref()),
        date_interval_criterion(properties, request.datetime.as_ref()),
        fields_criterion(request.fields.as_ref()),
        ids_criterion(request.ids.as_deref()),
        intersects_criterion(request.intersects.as_ref()),
        query_criterion(request),
    ])
}

/// Bounding box dimension.
#[must_use]
pub fn bbox_criterion(bbox: Option<[f64; 4]>) -> Option<Criterion> {
    bbox.map(Criterion::intersects_bbox)
}

/// Collection membership dimension.
///
/// An explicitly empty list means a referenced collection resolved to
/// nothing: no item should match at all, which is different from the absent
/// dimension.
#[must_use]
pub fn collections_criterion(collections: Option<&[String]>) -> Option<Criterion> {
    let collections = collections?;
    if collections.is_empty() {
        return Some(Criterion::not(Criterion::All));
    }
    Some(Criterion::in_set("collections", collections.iter().cloned()))
}

/// Datetime interval dimension, bound to the catalog's datetime property.
#[must_use]
pub fn date_interval_criterion(
    properties: &[Property],
    interval: Option<&DateInterval>,
) -> Option<Criterion> {
    let interval = interval?;
    let Some(property) = properties.iter().find(|p| p.kind.is_datetime()) else {
        debug!("datetime interval given but no datetime property configured");
        return None;
    };
    Some(Criterion::date_range(property.name.clone(), interval.from, interval.to))
}

/// Identifier dimension.
#[must_use]
pub fn ids_criterion(ids: Option<&[String]>) -> Option<Criterion> {
    let ids = ids?;
    if ids.is_empty() {
        return None;
    }
    Some(Criterion::in_set("id", ids.iter().cloned()))
}

/// Geometry intersection dimension.
#[must_use]
pub fn intersects_criterion(geometry: Option<&JsonValue>) -> Option<Criterion> {
    geometry.cloned().map(Criterion::intersects_geometry)
}

/// Field selection dimension: included properties must exist, excluded
/// properties must not.
#[must_use]
pub fn fields_criterion(fields: Option<&FieldSelection>) -> Option<Criterion> {
    let fields = fields?;
    let includes = fields.includes.iter().map(|f| Some(Criterion::exists(f.clone())));
    let excludes =
        fields.excludes.iter().map(|f| Some(Criterion::not(Criterion::exists(f.clone()))));
    let combined = Criterion::and_all(includes.chain(excludes));
    match combined {
        Criterion::All => None,
        other => Some(other),
    }
}

/// Free-query dimension: one constraint group per property.
#[must_use]
pub fn query_criterion(request: &SearchRequest) -> Option<Criterion> {
    if request.query.is_empty() {
        return None;
    }
    let combined = Criterion::and_all(
        request
            .query
            .iter()
            .map(|(property, object)| Some(query_object_criterion(property, object))),
    );
    Some(combined)
}

/// The criterion of one property's constraint group.
#[must_use]
pub fn query_object_criterion(field: &str, object: &QueryObject) -> Criterion {
    match object {
        QueryObject::String(q) => Criterion::and_all([
            q.eq.as_ref().map(|v| Criterion::eq(field, v.clone())),
            q.starts_with.as_ref().map(|v| Criterion::starts_with(field, v.clone())),
            q.contains.as_ref().map(|v| Criterion::contains(field, v.clone())),
            q.any_of.as_ref().map(|vs| Criterion::in_set(field, vs.iter().cloned())),
        ]),
        QueryObject::Number(q) => Criterion::and_all([
            q.eq.map(|v| Criterion::eq(field, v)),
            q.gt.map(|v| Criterion::gt(field, v)),
            q.gte.map(|v| Criterion::gte(field, v)),
            q.lt.map(|v| Criterion::lt(field, v)),
            q.lte.map(|v| Criterion::lte(field, v)),
            q.any_of.as_ref().map(|vs| Criterion::in_set(field, vs.iter().copied())),
        ]),
        QueryObject::Datetime(q) => Criterion::date_range(field, q.gte, q.lt),
        QueryObject::Bool(q) => {
            Criterion::and_all([q.eq.map(|v| Criterion::eq(field, v))])
        }
    }
}
