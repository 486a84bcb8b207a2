//! The next-sublevel helper: data-bounded child enumeration.
//!
//! Given a schema and a (possibly partial) browse path, [`next_children`]
//! returns the child paths that actually occur in the data, each exactly one
//! sublevel deeper than its parent. Number-range and string-prefix children
//! are enumerated from configuration alone; date-parts children are bounded
//! by a live min/max query so that, say, a February holds 28 or 29 children
//! rather than a fixed 30; exact-value children come from a distinct-values
//! aggregation. One call descends one sublevel (the caller re-invokes to
//! go deeper), and a leaf yields an empty list.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use drilldown_core::level::{
    days_in_month, DatePart, DatePartsLevel, ExactValueLevel, LevelValue, NumberRangeLevel,
    StringPrefixLevel, SublevelDef, SublevelValue,
};
use drilldown_core::{CollectionValue, LevelDef};
use tracing::debug;

use crate::convert::{collection_criterion, date_lower, date_upper};
use crate::error::QueryError;
use crate::index::SearchIndex;

/// Cap on the distinct values fetched for exact-value enumeration.
const MAX_DISTINCT_VALUES: usize = 500;

/// Compute the children of a browse path.
///
/// Extends the first partially valued level if there is one, otherwise
/// starts the first missing level. Backend failures propagate; an empty
/// result means the branch is legitimately a leaf or holds no data.
pub fn next_children(
    index: &dyn SearchIndex,
    value: &CollectionValue,
) -> Result<Vec<CollectionValue>, QueryError> {
    if value.is_fully_valued() {
        debug!("path is fully valued, no children");
        return Ok(Vec::new());
    }

    if let Some(partial) = value.first_partially_valued() {
        let partial = partial.clone();
        return match partial.definition().as_ref() {
            LevelDef::StringPrefix(level) => Ok(string_prefix_next(value, &partial, level)),
            LevelDef::DateParts(level) => date_parts_next(index, value, &partial, level),
            // Single-sublevel levels are fully valued as soon as they exist.
            LevelDef::NumberRange(_) | LevelDef::Exact(_) => Ok(Vec::new()),
        };
    }

    let Some(def) = value.first_missing_def() else {
        return Ok(Vec::new());
    };
    let def = Arc::clone(def);
    match def.as_ref() {
        LevelDef::Exact(level) => exact_first(index, value, &def, level),
        LevelDef::NumberRange(level) => Ok(number_range_first(value, &def, level)),
        LevelDef::StringPrefix(level) => Ok(string_prefix_first(value, &def, level)),
        LevelDef::DateParts(level) => date_parts_first(index, value, &def, level),
    }
}

/// One child per distinct value present in the data, sorted by value.
fn exact_first(
    index: &dyn SearchIndex,
    value: &CollectionValue,
    def: &Arc<LevelDef>,
    level: &ExactValueLevel,
) -> Result<Vec<CollectionValue>, QueryError> {
    let criterion = collection_criterion(value)?;
    let mut counts = index.value_counts(&criterion, &level.property.name, MAX_DISTINCT_VALUES)?;
    counts.sort_by(|a, b| a.value.cmp(&b.value));
    debug!(property = %level.property.name, children = counts.len(), "exact-value children");
    Ok(counts
        .into_iter()
        .map(|entry| {
            let label =
                format!("{}={} ({} elements)", level.property.name, entry.value, entry.count);
            let sublevel = SublevelValue::new(SublevelDef::ExactValue, entry.value, label);
            value.with_appended(LevelValue::new(Arc::clone(def), vec![sublevel]))
        })
        .collect())
}

/// The configured breakpoint buckets: `<min`, one bucket per step, `>max`.
fn number_range_first(
    value: &CollectionValue,
    def: &Arc<LevelDef>,
    level: &NumberRangeLevel,
) -> Vec<CollectionValue> {
    let breakpoints = level.breakpoints();
    let Some((&first, &last)) = breakpoints.first().zip(breakpoints.last()) else {
        return Vec::new();
    };

    let mut buckets: Vec<(Option<f64>, Option<f64>)> = Vec::with_capacity(breakpoints.len() + 1);
    buckets.push((None, Some(first)));
    for pair in breakpoints.windows(2) {
        buckets.push((Some(pair[0]), Some(pair[1])));
    }
    buckets.push((Some(last), None));

    buckets
        .into_iter()
        .map(|(from, to)| {
            let sublevel = SublevelValue::new(
                level.sublevel(),
                level.bucket_repr(from, to),
                level.bucket_label(from, to),
            );
            value.with_appended(LevelValue::new(Arc::clone(def), vec![sublevel]))
        })
        .collect()
}

/// One child per allowed character of the first prefix position.
fn string_prefix_first(
    value: &CollectionValue,
    def: &Arc<LevelDef>,
    level: &StringPrefixLevel,
) -> Vec<CollectionValue> {
    let Some(position) = level.sublevel_defs().first().copied() else {
        return Vec::new();
    };
    position
        .allowed_characters()
        .into_iter()
        .map(|character| {
            let label = format!("{}...", def.label(&character.to_string()));
            let sublevel = SublevelValue::new(position, character.to_string(), label);
            value.with_appended(LevelValue::new(Arc::clone(def), vec![sublevel]))
        })
        .collect()
}

/// One child per allowed character of the next prefix position.
fn string_prefix_next(
    value: &CollectionValue,
    partial: &LevelValue,
    level: &StringPrefixLevel,
) -> Vec<CollectionValue> {
    let prefix = partial.render();
    let Some(position) = level.sublevel_defs().get(partial.sublevels().len()).copied() else {
        return Vec::new();
    };
    position
        .allowed_characters()
        .into_iter()
        .map(|character| {
            let label =
                format!("{}...", partial.definition().label(&format!("{prefix}{character}")));
            let sublevel = SublevelValue::new(position, character.to_string(), label);
            value.with_last_extended(sublevel)
        })
        .collect()
}

/// One child per year between the data's min and max timestamps.
fn date_parts_first(
    index: &dyn SearchIndex,
    value: &CollectionValue,
    def: &Arc<LevelDef>,
    level: &DatePartsLevel,
) -> Result<Vec<CollectionValue>, QueryError> {
    use chrono::Datelike;

    let criterion = collection_criterion(value)?;
    let Some((min, max)) = index.date_bounds(&criterion, &level.property.name)? else {
        debug!(property = %level.property.name, "no dated items under path");
        return Ok(Vec::new());
    };
    debug!(property = %level.property.name, %min, %max, "year bounds");

    Ok((min.year()..=max.year())
        .map(|year| {
            let repr = year.to_string();
            let label = def.label(&repr);
            let sublevel = SublevelValue::new(SublevelDef::DatePart(DatePart::Year), repr, label);
            value.with_appended(LevelValue::new(Arc::clone(def), vec![sublevel]))
        })
        .collect())
}

/// One child per value of the next-finer granularity that intersects the
/// data's min/max timestamps under the current path.
fn date_parts_next(
    index: &dyn SearchIndex,
    value: &CollectionValue,
    partial: &LevelValue,
    level: &DatePartsLevel,
) -> Result<Vec<CollectionValue>, QueryError> {
    let property = &level.property.name;
    let parts = level.parts();
    let Some(next_part) = parts.get(partial.sublevels().len()).copied() else {
        return Ok(Vec::new());
    };

    let parent = partial.render();
    let components = crate::convert::date_components(&parent).ok_or_else(|| {
        QueryError::conversion(property, format!("unparsable date components in {parent:?}"))
    })?;

    let criterion = collection_criterion(value)?;
    let Some((min, max)) = index.date_bounds(&criterion, property)? else {
        debug!(property = %property, parent = %parent, "no dated items under path");
        return Ok(Vec::new());
    };

    let mut children = Vec::new();
    for candidate in granularity_candidates(next_part, &components) {
        let Some((start, end)) = candidate_interval(&components, candidate, next_part) else {
            continue;
        };
        if !intervals_intersect(start, end, min, max) {
            continue;
        }
        let repr = format!("{parent}{}{candidate:02}", next_part.separator());
        let label = partial.definition().label(&repr);
        let sublevel = SublevelValue::new(SublevelDef::DatePart(next_part), repr, label);
        children.push(value.with_last_extended(sublevel));
    }
    debug!(property = %property, parent = %parent, part = %next_part, children = children.len(), "date children");
    Ok(children)
}

/// The calendar range of one granularity under already-assigned components.
fn granularity_candidates(part: DatePart, components: &[i64]) -> Vec<u32> {
    match part {
        // The year is always the first component, never a "next" part.
        DatePart::Year => Vec::new(),
        DatePart::Month => (1..=12).collect(),
        DatePart::Day => {
            let year =
                components.first().and_then(|c| i32::try_from(*c).ok()).unwrap_or(1970);
            let month = components.get(1).and_then(|c| u32::try_from(*c).ok()).unwrap_or(1);
            (1..=days_in_month(year, month).unwrap_or(31)).collect()
        }
        DatePart::Hour => (0..=23).collect(),
        DatePart::Minute => (0..=59).collect(),
    }
}

/// The half-open interval a candidate child covers.
fn candidate_interval(
    components: &[i64],
    candidate: u32,
    part: DatePart,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut extended = components.to_vec();
    extended.push(i64::from(candidate));
    let start = date_lower(&extended)?;
    let end = date_upper(start, part)?;
    Some((start, end))
}

fn intervals_intersect(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min: DateTime<Utc>,
    max: DateTime<Utc>,
) -> bool {
    start <= max && end > min
}
