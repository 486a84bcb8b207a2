//! Parsing of per-property partition configuration into level definitions.
//!
//! The format-string grammar is small and type-directed:
//!
//! - string property + `PREFIX(<n>,<charset>)` → string-prefix level;
//! - datetime property + granularity tag (`YEAR`, `MONTH`, ...) → date-parts
//!   level;
//! - numeric property + `;`-separated ascending breakpoints (`0;10;20`) →
//!   number-range level;
//! - anything else → exact-value level, so every property stays
//!   partitionable without explicit configuration.
//!
//! A recognized-but-malformed numeric list is a hard [`ConfigError`] at
//! schema-build time; an absent or unrecognized format degrades gracefully.

use tracing::warn;

use crate::error::ConfigError;
use crate::property::Property;

use super::def::{
    DatePartsLevel, ExactValueLevel, LevelDef, NumberRangeLevel, StringPrefixLevel,
};
use super::granularity::DatePart;

/// Parse a property's partition configuration into a level definition.
pub fn parse_level(property: &Property) -> Result<LevelDef, ConfigError> {
    let format = property.format.as_deref().map(str::trim).unwrap_or("");
    if property.kind.is_string() {
        Ok(parse_string_level(property, format))
    } else if property.kind.is_numeric() {
        parse_number_level(property, format)
    } else if property.kind.is_datetime() {
        Ok(parse_datetime_level(property, format))
    } else {
        Ok(exact(property))
    }
}

fn exact(property: &Property) -> LevelDef {
    LevelDef::Exact(ExactValueLevel::new(property.clone()))
}

fn parse_datetime_level(property: &Property, format: &str) -> LevelDef {
    match DatePart::from_tag(format) {
        Some(deepest) => LevelDef::DateParts(DatePartsLevel::new(property.clone(), deepest)),
        None => {
            if !format.is_empty() {
                warn!(
                    property = %property.name,
                    format,
                    "unrecognized date granularity, falling back to exact-value level"
                );
            }
            exact(property)
        }
    }
}

fn parse_number_level(property: &Property, format: &str) -> Result<LevelDef, ConfigError> {
    if format.is_empty() {
        return Ok(exact(property));
    }
    if !format.contains(';') {
        warn!(
            property = %property.name,
            format,
            "unrecognized number format, falling back to exact-value level"
        );
        return Ok(exact(property));
    }

    let malformed = |reason: String| ConfigError::InvalidNumberFormat {
        property: property.name.clone(),
        format: format.to_owned(),
        reason,
    };

    let breakpoints = format
        .split(';')
        .map(|token| {
            token
                .trim()
                .parse::<f64>()
                .map_err(|_| malformed(format!("non-numeric breakpoint {token:?}")))
        })
        .collect::<Result<Vec<f64>, ConfigError>>()?;

    if breakpoints.len() < 2 {
        return Err(malformed("at least two breakpoints required".to_owned()));
    }
    if breakpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(malformed("breakpoints must be strictly ascending".to_owned()));
    }

    let min = breakpoints[0];
    let step = breakpoints[1] - breakpoints[0];
    let max = breakpoints[breakpoints.len() - 1];
    Ok(LevelDef::NumberRange(NumberRangeLevel::new(property.clone(), min, step, max)))
}

fn parse_string_level(property: &Property, format: &str) -> LevelDef {
    if format.is_empty() {
        return exact(property);
    }
    if let Some(level) = try_prefix_format(property, format) {
        return level;
    }
    warn!(
        property = %property.name,
        format,
        "unrecognized string format, falling back to exact-value level"
    );
    exact(property)
}

fn try_prefix_format(property: &Property, format: &str) -> Option<LevelDef> {
    let args = format.strip_prefix("PREFIX(")?.strip_suffix(')')?;
    let (count, charset) = args.split_once(',')?;
    let count: u32 = count.trim().parse().ok().filter(|n| *n >= 1)?;
    let alpha = charset.chars().any(|c| c.is_ascii_alphabetic());
    let digits = charset.chars().any(|c| c.is_ascii_digit());
    if !alpha && !digits {
        return None;
    }
    Some(LevelDef::StringPrefix(StringPrefixLevel::new(property.clone(), count, alpha, digits)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::sublevel::SublevelDef;
    use crate::property::PropertyType;

    fn prop(kind: PropertyType, format: &str) -> Property {
        Property::new("p", kind).with_format(format)
    }

    #[test]
    fn prefix_format_alphanumeric() {
        let level = parse_level(&prop(PropertyType::String, "PREFIX(2,A9)")).expect("parse");
        let LevelDef::StringPrefix(level) = level else {
            panic!("expected a string-prefix level");
        };
        assert_eq!(level.sublevel_defs().len(), 2);
        for (i, def) in level.sublevel_defs().iter().enumerate() {
            assert_eq!(
                *def,
                SublevelDef::StringPrefix {
                    position: u32::try_from(i).expect("position"),
                    alpha: true,
                    digits: true
                }
            );
        }
    }

    #[test]
    fn prefix_format_digits_only() {
        let level = parse_level(&prop(PropertyType::String, "PREFIX(3,9)")).expect("parse");
        let LevelDef::StringPrefix(level) = level else {
            panic!("expected a string-prefix level");
        };
        assert_eq!(level.sublevel_defs().len(), 3);
        assert!(level.sublevel_defs().iter().all(|def| matches!(
            def,
            SublevelDef::StringPrefix { alpha: false, digits: true, .. }
        )));
    }

    #[test]
    fn malformed_prefix_degrades_to_exact() {
        for format in ["PREFIX(0,9)", "PREFIX(2)", "PREFIX(x,9)", "PREFIX(2,-)", "STARTS(2,9)"] {
            let level = parse_level(&prop(PropertyType::String, format)).expect("parse");
            assert!(matches!(level, LevelDef::Exact(_)), "format {format:?}");
        }
    }

    #[test]
    fn datetime_tags() {
        let level = parse_level(&prop(PropertyType::Datetime, "DAY")).expect("parse");
        let LevelDef::DateParts(level) = level else {
            panic!("expected a date-parts level");
        };
        assert_eq!(level.deepest, DatePart::Day);
        assert_eq!(level.parts().len(), 3);
    }

    #[test]
    fn unrecognized_datetime_degrades_to_exact() {
        for format in ["WEEK", "day", ""] {
            let level = parse_level(&prop(PropertyType::Datetime, format)).expect("parse");
            assert!(matches!(level, LevelDef::Exact(_)), "format {format:?}");
        }
    }

    #[test]
    fn number_breakpoints() {
        let level = parse_level(&prop(PropertyType::Number, "0;10;20")).expect("parse");
        let LevelDef::NumberRange(level) = level else {
            panic!("expected a number-range level");
        };
        assert_eq!(level.min, 0.0);
        assert_eq!(level.step, 10.0);
        assert_eq!(level.max, 20.0);
    }

    #[test]
    fn number_breakpoints_use_first_gap_only() {
        let level = parse_level(&prop(PropertyType::Percentage, "10;20;30;47")).expect("parse");
        let LevelDef::NumberRange(level) = level else {
            panic!("expected a number-range level");
        };
        assert_eq!(level.min, 10.0);
        assert_eq!(level.step, 10.0);
        assert_eq!(level.max, 47.0);
    }

    #[test]
    fn malformed_number_lists_are_hard_errors() {
        for format in ["20;10", "0;0;10", "0;abc;20", "0;", ";10"] {
            let err = parse_level(&prop(PropertyType::Number, format));
            assert!(
                matches!(err, Err(ConfigError::InvalidNumberFormat { .. })),
                "format {format:?}"
            );
        }
    }

    #[test]
    fn unrecognized_number_format_degrades_to_exact() {
        for format in ["", "10", "buckets"] {
            let level = parse_level(&prop(PropertyType::Number, format)).expect("parse");
            assert!(matches!(level, LevelDef::Exact(_)), "format {format:?}");
        }
    }

    #[test]
    fn opaque_kinds_always_exact() {
        for kind in [PropertyType::Boolean, PropertyType::Url, PropertyType::Json] {
            let level = parse_level(&prop(kind, "PREFIX(2,9)")).expect("parse");
            assert!(matches!(level, LevelDef::Exact(_)));
        }
    }
}
