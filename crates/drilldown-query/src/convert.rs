//! Translation of browse-path level values into query constraints.
//!
//! Every valued level of a collection path constrains its property: an
//! exact level pins the value, a number-range level bounds it, a date-parts
//! level selects the half-open interval `[lower, lower + one unit of the
//! deepest assigned granularity)`, and a string-prefix level matches the
//! accumulated prefix. Folding these with AND yields the criterion that
//! scopes every query issued while expanding that path.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use drilldown_core::level::{DatePart, LevelValue, SublevelDef};
use drilldown_core::{CollectionValue, LevelDef, PropertyType};

use crate::builder::query_object_criterion;
use crate::criterion::Criterion;
use crate::error::QueryError;
use crate::request::QueryObject;

/// Translate one valued level into a `(property, constraint)` pair.
pub fn level_query_object(level: &LevelValue) -> Result<(String, QueryObject), QueryError> {
    let name = level.definition().property().name.clone();
    let object = match level.definition().as_ref() {
        LevelDef::Exact(_) => exact_query_object(level)?,
        LevelDef::NumberRange(_) => number_range_query_object(level)?,
        LevelDef::DateParts(_) => date_parts_query_object(level)?,
        LevelDef::StringPrefix(_) => QueryObject::starts_with(level.render()),
    };
    Ok((name, object))
}

/// The criterion scoping all queries under a browse path.
pub fn collection_criterion(value: &CollectionValue) -> Result<Criterion, QueryError> {
    let mut query: BTreeMap<String, QueryObject> = BTreeMap::new();
    for level in value.levels() {
        let (name, object) = level_query_object(level)?;
        query.insert(name, object);
    }
    Ok(Criterion::and_all(
        query.iter().map(|(name, object)| Some(query_object_criterion(name, object))),
    ))
}

fn exact_query_object(level: &LevelValue) -> Result<QueryObject, QueryError> {
    let property = level.definition().property();
    let value = level.render();
    match property.kind {
        kind if kind.is_numeric() => {
            let number: f64 = value.parse().map_err(|_| {
                QueryError::conversion(
                    &property.name,
                    format!("exact value {value:?} is not a number"),
                )
            })?;
            Ok(QueryObject::number_eq(number))
        }
        PropertyType::Boolean => {
            let flag: bool = value.parse().map_err(|_| {
                QueryError::conversion(
                    &property.name,
                    format!("exact value {value:?} is not a boolean"),
                )
            })?;
            Ok(QueryObject::bool_eq(flag))
        }
        // String-like kinds, datetimes and opaque values match verbatim.
        _ => Ok(QueryObject::string_eq(value)),
    }
}

fn number_range_query_object(level: &LevelValue) -> Result<QueryObject, QueryError> {
    let property = &level.definition().property().name;
    let value = level.render();
    let unparsable =
        |_| QueryError::conversion(property, format!("unparsable number range {value:?}"));
    if let Some(rest) = value.strip_prefix('<') {
        return Ok(QueryObject::number_lt(rest.parse().map_err(unparsable)?));
    }
    if let Some(rest) = value.strip_prefix('>') {
        return Ok(QueryObject::number_gt(rest.parse().map_err(unparsable)?));
    }
    if let Some((low, high)) = value.split_once(';') {
        return Ok(QueryObject::number_between(
            low.parse().map_err(unparsable)?,
            high.parse().map_err(unparsable)?,
        ));
    }
    Err(QueryError::conversion(property, format!("unparsable number range {value:?}")))
}

fn date_parts_query_object(level: &LevelValue) -> Result<QueryObject, QueryError> {
    let property = &level.definition().property().name;
    let Some(last) = level.sublevels().last() else {
        return Err(QueryError::conversion(property, "no date component assigned"));
    };
    let SublevelDef::DatePart(granularity) = last.def else {
        return Err(QueryError::conversion(property, "level is not date-based"));
    };
    let rendered = level.render();
    let components = date_components(&rendered)
        .ok_or_else(|| QueryError::conversion(property, format!("unparsable date {rendered:?}")))?;
    let lower = date_lower(&components)
        .ok_or_else(|| QueryError::conversion(property, format!("invalid date {rendered:?}")))?;
    let upper = date_upper(lower, granularity)
        .ok_or_else(|| QueryError::conversion(property, format!("invalid date {rendered:?}")))?;
    Ok(QueryObject::datetime_range(lower, upper))
}

/// Split an accumulated date repr into its integer components.
pub(crate) fn date_components(rendered: &str) -> Option<Vec<i64>> {
    rendered.split(['-', 'T', ':']).map(|token| token.parse().ok()).collect()
}

/// The instant at which a partially specified date starts.
pub(crate) fn date_lower(components: &[i64]) -> Option<DateTime<Utc>> {
    let year = i32::try_from(*components.first()?).ok()?;
    let month = components.get(1).map_or(Some(1), |c| u32::try_from(*c).ok())?;
    let day = components.get(2).map_or(Some(1), |c| u32::try_from(*c).ok())?;
    let hour = components.get(3).map_or(Some(0), |c| u32::try_from(*c).ok())?;
    let minute = components.get(4).map_or(Some(0), |c| u32::try_from(*c).ok())?;
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}

/// The instant one unit of `granularity` after `lower`.
pub(crate) fn date_upper(lower: DateTime<Utc>, granularity: DatePart) -> Option<DateTime<Utc>> {
    match granularity {
        DatePart::Year => lower.checked_add_months(Months::new(12)),
        DatePart::Month => lower.checked_add_months(Months::new(1)),
        DatePart::Day => lower.checked_add_signed(Duration::days(1)),
        DatePart::Hour => lower.checked_add_signed(Duration::hours(1)),
        DatePart::Minute => lower.checked_add_signed(Duration::minutes(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use drilldown_core::level::parse_level;
    use drilldown_core::{Property, PropertyType};

    fn level_value(property: Property, repr: &str) -> LevelValue {
        let def = Arc::new(parse_level(&property).expect("level"));
        LevelValue::parse(def, repr).expect("repr")
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).single().expect("timestamp")
    }

    #[test]
    fn number_range_shapes() {
        let prop = Property::new("cloud", PropertyType::Number).with_format("0;10;20");
        let (name, object) = level_query_object(&level_value(prop.clone(), "<0.0")).expect("lt");
        assert_eq!(name, "cloud");
        assert_eq!(object, QueryObject::number_lt(0.0));

        let (_, object) = level_query_object(&level_value(prop.clone(), "0.0;10.0")).expect("between");
        assert_eq!(object, QueryObject::number_between(0.0, 10.0));

        let (_, object) = level_query_object(&level_value(prop, ">20.0")).expect("gt");
        assert_eq!(object, QueryObject::number_gt(20.0));
    }

    #[test]
    fn date_parts_intervals_follow_granularity() {
        let prop = Property::new("acquired", PropertyType::Datetime).with_format("MINUTE");

        let (_, object) = level_query_object(&level_value(prop.clone(), "2020")).expect("year");
        assert_eq!(object, QueryObject::datetime_range(ts(2020, 1, 1, 0, 0), ts(2021, 1, 1, 0, 0)));

        let (_, object) = level_query_object(&level_value(prop.clone(), "2020-02")).expect("month");
        assert_eq!(object, QueryObject::datetime_range(ts(2020, 2, 1, 0, 0), ts(2020, 3, 1, 0, 0)));

        let (_, object) =
            level_query_object(&level_value(prop.clone(), "2020-02-16")).expect("day");
        assert_eq!(
            object,
            QueryObject::datetime_range(ts(2020, 2, 16, 0, 0), ts(2020, 2, 17, 0, 0))
        );

        let (_, object) =
            level_query_object(&level_value(prop.clone(), "2020-02-16T12")).expect("hour");
        assert_eq!(
            object,
            QueryObject::datetime_range(ts(2020, 2, 16, 12, 0), ts(2020, 2, 16, 13, 0))
        );

        let (_, object) =
            level_query_object(&level_value(prop, "2020-02-16T12:30")).expect("minute");
        assert_eq!(
            object,
            QueryObject::datetime_range(ts(2020, 2, 16, 12, 30), ts(2020, 2, 16, 12, 31))
        );
    }

    #[test]
    fn prefix_becomes_starts_with() {
        let prop = Property::new("station", PropertyType::String).with_format("PREFIX(2,9)");
        let (name, object) = level_query_object(&level_value(prop, "77")).expect("prefix");
        assert_eq!(name, "station");
        assert_eq!(object, QueryObject::starts_with("77"));
    }

    #[test]
    fn exact_values_follow_property_kind() {
        let text = Property::new("platform", PropertyType::String);
        let (_, object) = level_query_object(&level_value(text, "S2A")).expect("string");
        assert_eq!(object, QueryObject::string_eq("S2A"));

        let number = Property::new("orbit", PropertyType::Number);
        let (_, object) = level_query_object(&level_value(number.clone(), "12")).expect("number");
        assert_eq!(object, QueryObject::number_eq(12.0));

        let err = level_query_object(&level_value(number, "twelve"));
        assert!(matches!(err, Err(QueryError::Conversion { .. })));

        let flag = Property::new("published", PropertyType::Boolean);
        let (_, object) = level_query_object(&level_value(flag, "true")).expect("bool");
        assert_eq!(object, QueryObject::bool_eq(true));
    }

    #[test]
    fn collection_criterion_folds_levels() {
        use drilldown_core::path::parse_path;
        use drilldown_core::CollectionDef;

        let cloud = Property::new("cloud", PropertyType::Number).with_format("0;10;20");
        let acquired = Property::new("acquired", PropertyType::Datetime).with_format("DAY");
        let def = CollectionDef::new(vec![
            parse_level(&cloud).expect("cloud"),
            parse_level(&acquired).expect("acquired"),
        ]);

        let root = parse_path(&def, "").expect("root");
        assert_eq!(collection_criterion(&root).expect("criterion"), Criterion::All);

        let value = parse_path(&def, "cloud=0.0;10.0/acquired=2020-02").expect("path");
        let criterion = collection_criterion(&value).expect("criterion");
        assert_eq!(
            criterion,
            Criterion::And(vec![
                Criterion::date_range("acquired", Some(ts(2020, 2, 1, 0, 0)), Some(ts(2020, 3, 1, 0, 0))),
                Criterion::And(vec![Criterion::gte("cloud", 0.0), Criterion::lte("cloud", 10.0)]),
            ])
        );
    }
}
