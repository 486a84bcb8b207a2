//! The four polymorphic level definitions.
//!
//! Each variant knows how to parse a textual repr into sublevel values,
//! render assigned sublevels back to the identical repr, and report whether
//! a value has reached the level's finest configured granularity. The
//! variants form the closed [`LevelDef`] union; everything that consumes a
//! level matches on it exhaustively.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::property::Property;

use super::granularity::{days_in_month, DatePart};
use super::sublevel::{SublevelDef, SublevelValue};

/// Render a double the way generated reprs expect it (`0.0`, `10.5`).
fn fmt_double(value: f64) -> String {
    format!("{value:?}")
}

/// The `"name=value"` human label for a rendered level value.
fn level_label(property: &Property, rendered: &str) -> String {
    format!("{}={rendered}", property.name)
}

/// A level partitioned by date parts, from year down to a configured
/// deepest granularity.
///
/// Sublevel values accumulate the textual prefix: drilling into February
/// 2020 produces the values `"2020"` then `"2020-02"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePartsLevel {
    /// The datetime property being partitioned.
    pub property: Property,
    /// The finest granularity this level drills down to.
    pub deepest: DatePart,
}

impl DatePartsLevel {
    /// Create a date-parts level.
    #[must_use]
    pub const fn new(property: Property, deepest: DatePart) -> Self {
        Self { property, deepest }
    }

    /// The ordered granularities of this level, `Year..=deepest`.
    #[must_use]
    pub fn parts(&self) -> Vec<DatePart> {
        self.deepest.down_to()
    }

    fn parse_sublevels(&self, repr: &str) -> Result<Vec<SublevelValue>, ParseError> {
        let parts = self.parts();
        let tokens: Vec<&str> = repr.split(['-', 'T', ':']).collect();
        if tokens.len() > parts.len() {
            return Err(ParseError::TooManyDateComponents {
                repr: repr.to_owned(),
                max: parts.len(),
            });
        }

        let mut values = Vec::with_capacity(tokens.len());
        let mut accumulated = String::new();
        let mut year = 0_i32;
        let mut month = 1_u32;
        for (part, token) in parts.into_iter().zip(tokens) {
            let component: i64 =
                token.parse().map_err(|_| ParseError::InvalidDateComponent {
                    repr: repr.to_owned(),
                    part,
                    token: token.to_owned(),
                })?;
            let out_of_range = ParseError::DateComponentOutOfRange {
                repr: repr.to_owned(),
                part,
                value: component,
            };
            match part {
                DatePart::Year => match i32::try_from(component) {
                    Ok(y) => year = y,
                    Err(_) => return Err(out_of_range),
                },
                DatePart::Month => {
                    if !(1..=12).contains(&component) {
                        return Err(out_of_range);
                    }
                    month = u32::try_from(component).unwrap_or(1);
                }
                DatePart::Day => {
                    let len = i64::from(days_in_month(year, month).unwrap_or(31));
                    if !(1..=len).contains(&component) {
                        return Err(out_of_range);
                    }
                }
                DatePart::Hour => {
                    if !(0..=23).contains(&component) {
                        return Err(out_of_range);
                    }
                }
                DatePart::Minute => {
                    if !(0..=59).contains(&component) {
                        return Err(out_of_range);
                    }
                }
            }
            accumulated.push_str(part.separator());
            accumulated.push_str(token);
            values.push(SublevelValue::new(
                SublevelDef::DatePart(part),
                accumulated.clone(),
                level_label(&self.property, &accumulated),
            ));
        }
        Ok(values)
    }
}

/// A level partitioned into numeric buckets of uniform width.
///
/// The level has a single sublevel: once a bucket is chosen the level is
/// fully valued. Finer drilling happens by reconfiguring the bucket width,
/// not by sublevel depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberRangeLevel {
    /// The numeric property being partitioned.
    pub property: Property,
    /// Lower breakpoint.
    pub min: f64,
    /// Uniform bucket width.
    pub step: f64,
    /// Upper breakpoint.
    pub max: f64,
}

impl NumberRangeLevel {
    /// Create a number-range level.
    #[must_use]
    pub const fn new(property: Property, min: f64, step: f64, max: f64) -> Self {
        Self { property, min, step, max }
    }

    /// The single sublevel definition of this level.
    #[must_use]
    pub const fn sublevel(&self) -> SublevelDef {
        SublevelDef::NumberRange { min: self.min, step: self.step, max: self.max }
    }

    /// The configured breakpoints, `min..=max` stepped by `step`.
    ///
    /// A non-positive step collapses to the bare `min`/`max` bounds, leaving
    /// only the unbounded intervals around them.
    #[must_use]
    pub fn breakpoints(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            if self.max > self.min {
                return vec![self.min, self.max];
            }
            return vec![self.min];
        }
        let mut breakpoints = Vec::new();
        let mut current = self.min;
        // The step/100 slack absorbs floating point drift on the last bucket.
        let limit = self.max + self.step / 100.0;
        while current <= limit {
            breakpoints.push(current);
            current += self.step;
        }
        breakpoints
    }

    /// The repr of a bucket: `"<max"`, `"min;max"` or `">min"`.
    #[must_use]
    pub fn bucket_repr(&self, from: Option<f64>, to: Option<f64>) -> String {
        match (from, to) {
            (None, Some(to)) => format!("<{}", fmt_double(to)),
            (Some(from), Some(to)) => format!("{};{}", fmt_double(from), fmt_double(to)),
            (Some(from), None) => format!(">{}", fmt_double(from)),
            (None, None) => String::new(),
        }
    }

    /// The human label of a bucket.
    #[must_use]
    pub fn bucket_label(&self, from: Option<f64>, to: Option<f64>) -> String {
        let name = &self.property.name;
        match (from, to) {
            (None, Some(to)) => format!("{name} < {}", fmt_double(to)),
            (Some(from), Some(to)) => {
                format!("{} < {name} < {}", fmt_double(from), fmt_double(to))
            }
            (Some(from), None) => format!("{name} > {}", fmt_double(from)),
            (None, None) => name.clone(),
        }
    }

    fn parse_sublevels(&self, repr: &str) -> Result<Vec<SublevelValue>, ParseError> {
        let invalid = || ParseError::InvalidNumberRange { repr: repr.to_owned() };
        if let Some(rest) = repr.strip_prefix('<') {
            rest.parse::<f64>().map_err(|_| invalid())?;
        } else if let Some(rest) = repr.strip_prefix('>') {
            rest.parse::<f64>().map_err(|_| invalid())?;
        } else if let Some((low, high)) = repr.split_once(';') {
            low.parse::<f64>().map_err(|_| invalid())?;
            high.parse::<f64>().map_err(|_| invalid())?;
        } else {
            return Err(invalid());
        }
        Ok(vec![SublevelValue::new(
            self.sublevel(),
            repr,
            level_label(&self.property, repr),
        )])
    }
}

/// A level partitioned by string prefix, one character per sublevel.
///
/// Each sublevel value is the single character at its position; labels
/// accumulate the prefix seen so far with a trailing `...` marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringPrefixLevel {
    /// The string property being partitioned.
    pub property: Property,
    /// One sublevel per prefix position.
    sublevels: Vec<SublevelDef>,
}

impl StringPrefixLevel {
    /// Create a string-prefix level with `count` positions sharing the same
    /// character-class flags.
    #[must_use]
    pub fn new(property: Property, count: u32, alpha: bool, digits: bool) -> Self {
        let sublevels = (0..count)
            .map(|position| SublevelDef::StringPrefix { position, alpha, digits })
            .collect();
        Self { property, sublevels }
    }

    /// The ordered sublevel definitions.
    #[must_use]
    pub fn sublevel_defs(&self) -> &[SublevelDef] {
        &self.sublevels
    }

    fn parse_sublevels(&self, repr: &str) -> Result<Vec<SublevelValue>, ParseError> {
        let characters: Vec<char> = repr.chars().collect();
        if characters.len() > self.sublevels.len() {
            return Err(ParseError::PrefixTooLong {
                repr: repr.to_owned(),
                max: self.sublevels.len(),
            });
        }
        let mut values = Vec::with_capacity(characters.len());
        let mut prefix = String::new();
        for (position, (def, character)) in
            self.sublevels.iter().zip(characters).enumerate()
        {
            if !def.accepts(character) {
                return Err(ParseError::PrefixCharNotAllowed {
                    repr: repr.to_owned(),
                    position: u32::try_from(position).unwrap_or(u32::MAX),
                    character,
                });
            }
            prefix.push(character);
            values.push(SublevelValue::new(
                *def,
                character.to_string(),
                format!("{}...", level_label(&self.property, &prefix)),
            ));
        }
        Ok(values)
    }
}

/// The fallback level: a single sublevel matching the literal string value.
///
/// Always fully valued once assigned, which makes every property
/// partitionable even without explicit format configuration, at the cost of
/// a one-level, non-drillable partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactValueLevel {
    /// The property being partitioned.
    pub property: Property,
}

impl ExactValueLevel {
    /// Create an exact-value level.
    #[must_use]
    pub const fn new(property: Property) -> Self {
        Self { property }
    }

    fn parse_sublevels(&self, repr: &str) -> Result<Vec<SublevelValue>, ParseError> {
        Ok(vec![SublevelValue::new(
            SublevelDef::ExactValue,
            repr,
            level_label(&self.property, repr),
        )])
    }
}

/// One property-based dimension of the partition hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LevelDef {
    /// Date-part breakdown of a datetime property.
    DateParts(DatePartsLevel),
    /// Numeric bucketing of a numeric property.
    NumberRange(NumberRangeLevel),
    /// String-prefix breakdown of a string property.
    StringPrefix(StringPrefixLevel),
    /// Exact-value grouping of any property.
    Exact(ExactValueLevel),
}

impl LevelDef {
    /// The property this level partitions.
    #[must_use]
    pub const fn property(&self) -> &Property {
        match self {
            Self::DateParts(level) => &level.property,
            Self::NumberRange(level) => &level.property,
            Self::StringPrefix(level) => &level.property,
            Self::Exact(level) => &level.property,
        }
    }

    /// The ordered sublevel definitions of this level, coarse to fine.
    #[must_use]
    pub fn sublevels(&self) -> Vec<SublevelDef> {
        match self {
            Self::DateParts(level) => {
                level.parts().into_iter().map(SublevelDef::DatePart).collect()
            }
            Self::NumberRange(level) => vec![level.sublevel()],
            Self::StringPrefix(level) => level.sublevel_defs().to_vec(),
            Self::Exact(_) => vec![SublevelDef::ExactValue],
        }
    }

    /// Parse a textual repr into sublevel values.
    ///
    /// Deterministic and total for well-formed input; malformed input fails
    /// explicitly rather than being truncated.
    pub fn parse_sublevels(&self, repr: &str) -> Result<Vec<SublevelValue>, ParseError> {
        if repr.is_empty() {
            return Err(ParseError::EmptyValue);
        }
        match self {
            Self::DateParts(level) => level.parse_sublevels(repr),
            Self::NumberRange(level) => level.parse_sublevels(repr),
            Self::StringPrefix(level) => level.parse_sublevels(repr),
            Self::Exact(level) => level.parse_sublevels(repr),
        }
    }

    /// Render assigned sublevels back to the repr that parses to them.
    #[must_use]
    pub fn render(&self, sublevels: &[SublevelValue]) -> String {
        match self {
            Self::StringPrefix(_) => {
                sublevels.iter().map(|sub| sub.value.as_str()).collect()
            }
            Self::DateParts(_) | Self::NumberRange(_) | Self::Exact(_) => {
                sublevels.last().map(|sub| sub.value.clone()).unwrap_or_default()
            }
        }
    }

    /// Whether `assigned` sublevel values reach this level's finest
    /// granularity.
    #[must_use]
    pub fn is_fully_valued(&self, assigned: usize) -> bool {
        match self {
            Self::DateParts(level) => assigned == level.parts().len(),
            Self::StringPrefix(level) => assigned == level.sublevel_defs().len(),
            Self::NumberRange(_) | Self::Exact(_) => assigned >= 1,
        }
    }

    /// The `"name=value"` human label for a rendered value of this level.
    #[must_use]
    pub fn label(&self, rendered: &str) -> String {
        level_label(self.property(), rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyType;

    fn datetime_prop() -> Property {
        Property::new("acquired", PropertyType::Datetime)
    }

    fn number_prop() -> Property {
        Property::new("cloud", PropertyType::Number)
    }

    fn string_prop() -> Property {
        Property::new("station", PropertyType::String)
    }

    #[test]
    fn date_parts_parse_accumulates() {
        let level = DatePartsLevel::new(datetime_prop(), DatePart::Day);
        let values = LevelDef::DateParts(level).parse_sublevels("2020-02-03").expect("parse");
        assert_eq!(values.len(), 3);
        assert_eq!(values[0].value, "2020");
        assert_eq!(values[1].value, "2020-02");
        assert_eq!(values[2].value, "2020-02-03");
        assert_eq!(values[2].label, "acquired=2020-02-03");
    }

    #[test]
    fn date_parts_partial_parse() {
        let def = LevelDef::DateParts(DatePartsLevel::new(datetime_prop(), DatePart::Minute));
        let values = def.parse_sublevels("2020-02").expect("parse");
        assert_eq!(values.len(), 2);
        assert!(!def.is_fully_valued(values.len()));
        assert_eq!(def.render(&values), "2020-02");
    }

    #[test]
    fn date_parts_full_time_repr() {
        let def = LevelDef::DateParts(DatePartsLevel::new(datetime_prop(), DatePart::Minute));
        let values = def.parse_sublevels("2020-02-03T12:30").expect("parse");
        assert_eq!(values.len(), 5);
        assert!(def.is_fully_valued(values.len()));
        assert_eq!(def.render(&values), "2020-02-03T12:30");
    }

    #[test]
    fn date_parts_rejects_bad_components() {
        let def = LevelDef::DateParts(DatePartsLevel::new(datetime_prop(), DatePart::Minute));
        assert!(matches!(
            def.parse_sublevels("2020-13"),
            Err(ParseError::DateComponentOutOfRange { .. })
        ));
        assert!(matches!(
            def.parse_sublevels("2021-02-29"),
            Err(ParseError::DateComponentOutOfRange { .. })
        ));
        assert!(def.parse_sublevels("2020-02-29").is_ok());
        assert!(matches!(
            def.parse_sublevels("2020-xx"),
            Err(ParseError::InvalidDateComponent { .. })
        ));
        assert!(matches!(
            def.parse_sublevels("2020-02-03T24"),
            Err(ParseError::DateComponentOutOfRange { .. })
        ));
    }

    #[test]
    fn date_parts_rejects_excess_components() {
        let def = LevelDef::DateParts(DatePartsLevel::new(datetime_prop(), DatePart::Month));
        assert!(matches!(
            def.parse_sublevels("2020-02-03"),
            Err(ParseError::TooManyDateComponents { max: 2, .. })
        ));
    }

    #[test]
    fn number_range_parse_shapes_roundtrip() {
        let level = NumberRangeLevel::new(number_prop(), 0.0, 10.0, 20.0);
        let def = LevelDef::NumberRange(level);
        for repr in ["<0.0", "0.0;10.0", ">20.0"] {
            let values = def.parse_sublevels(repr).expect("parse");
            assert_eq!(values.len(), 1);
            assert!(def.is_fully_valued(values.len()));
            assert_eq!(def.render(&values), repr);
        }
    }

    #[test]
    fn number_range_rejects_garbage() {
        let def = LevelDef::NumberRange(NumberRangeLevel::new(number_prop(), 0.0, 10.0, 20.0));
        assert!(matches!(
            def.parse_sublevels("10"),
            Err(ParseError::InvalidNumberRange { .. })
        ));
        assert!(matches!(
            def.parse_sublevels("a;b"),
            Err(ParseError::InvalidNumberRange { .. })
        ));
        assert!(matches!(
            def.parse_sublevels("<abc"),
            Err(ParseError::InvalidNumberRange { .. })
        ));
    }

    #[test]
    fn number_range_breakpoints_and_buckets() {
        let level = NumberRangeLevel::new(number_prop(), 0.0, 10.0, 20.0);
        assert_eq!(level.breakpoints(), vec![0.0, 10.0, 20.0]);
        assert_eq!(level.bucket_repr(None, Some(0.0)), "<0.0");
        assert_eq!(level.bucket_repr(Some(0.0), Some(10.0)), "0.0;10.0");
        assert_eq!(level.bucket_repr(Some(20.0), None), ">20.0");
        assert_eq!(level.bucket_label(Some(0.0), Some(10.0)), "0.0 < cloud < 10.0");
        assert_eq!(level.bucket_label(None, Some(0.0)), "cloud < 0.0");
        assert_eq!(level.bucket_label(Some(20.0), None), "cloud > 20.0");
    }

    #[test]
    fn number_range_zero_step_keeps_open_intervals_only() {
        let level = NumberRangeLevel::new(number_prop(), 5.0, 0.0, 9.0);
        assert_eq!(level.breakpoints(), vec![5.0, 9.0]);
    }

    #[test]
    fn string_prefix_parse() {
        let def = LevelDef::StringPrefix(StringPrefixLevel::new(string_prop(), 2, false, true));
        let values = def.parse_sublevels("77").expect("parse");
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, "7");
        assert_eq!(values[1].value, "7");
        assert_eq!(values[0].label, "station=7...");
        assert_eq!(values[1].label, "station=77...");
        assert!(def.is_fully_valued(values.len()));
        assert_eq!(def.render(&values), "77");
    }

    #[test]
    fn string_prefix_rejects_overlong_and_foreign_chars() {
        let def = LevelDef::StringPrefix(StringPrefixLevel::new(string_prop(), 2, false, true));
        assert!(matches!(
            def.parse_sublevels("777"),
            Err(ParseError::PrefixTooLong { max: 2, .. })
        ));
        assert!(matches!(
            def.parse_sublevels("7A"),
            Err(ParseError::PrefixCharNotAllowed { position: 1, character: 'A', .. })
        ));
    }

    #[test]
    fn exact_value_wraps_verbatim() {
        let def = LevelDef::Exact(ExactValueLevel::new(string_prop()));
        let values = def.parse_sublevels("SENTINEL-2").expect("parse");
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].value, "SENTINEL-2");
        assert_eq!(values[0].label, "station=SENTINEL-2");
        assert!(def.is_fully_valued(values.len()));
        assert_eq!(def.render(&values), "SENTINEL-2");
    }

    #[test]
    fn empty_repr_is_rejected_everywhere() {
        let defs = [
            LevelDef::DateParts(DatePartsLevel::new(datetime_prop(), DatePart::Day)),
            LevelDef::NumberRange(NumberRangeLevel::new(number_prop(), 0.0, 10.0, 20.0)),
            LevelDef::StringPrefix(StringPrefixLevel::new(string_prop(), 2, true, true)),
            LevelDef::Exact(ExactValueLevel::new(string_prop())),
        ];
        for def in defs {
            assert!(matches!(def.parse_sublevels(""), Err(ParseError::EmptyValue)));
        }
    }
}
