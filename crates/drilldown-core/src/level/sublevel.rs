//! Sublevel definitions and values.

use serde::{Deserialize, Serialize};

use super::granularity::DatePart;

/// One atomic slice of a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SublevelDef {
    /// One date/time granularity step.
    DatePart(DatePart),
    /// One numeric bucket configuration.
    ///
    /// A step of zero means the level only offers the unbounded intervals
    /// below `min` and above `max`.
    NumberRange {
        /// Lower breakpoint.
        min: f64,
        /// Uniform bucket width.
        step: f64,
        /// Upper breakpoint.
        max: f64,
    },
    /// One character position of a string prefix.
    StringPrefix {
        /// 0-based character position.
        position: u32,
        /// Whether uppercase letters are accepted at this position.
        alpha: bool,
        /// Whether digits are accepted at this position.
        digits: bool,
    },
    /// The single sublevel of an exact-value level; matches the literal value.
    ExactValue,
}

impl SublevelDef {
    /// The alphabet a string-prefix sublevel enumerates: digits `0..=9`
    /// when `digits` is set, then uppercase `A..=Z` when `alpha` is set.
    ///
    /// Empty for the other variants, whose children are not character-based.
    #[must_use]
    pub fn allowed_characters(&self) -> Vec<char> {
        match self {
            Self::StringPrefix { alpha, digits, .. } => {
                let mut characters = Vec::new();
                if *digits {
                    characters.extend('0'..='9');
                }
                if *alpha {
                    characters.extend('A'..='Z');
                }
                characters
            }
            _ => Vec::new(),
        }
    }

    /// Whether a string-prefix sublevel accepts the given character.
    #[must_use]
    pub fn accepts(&self, character: char) -> bool {
        match self {
            Self::StringPrefix { alpha, digits, .. } => {
                (*alpha && character.is_ascii_alphabetic())
                    || (*digits && character.is_ascii_digit())
            }
            _ => false,
        }
    }
}

/// A valued sublevel: the definition it instantiates, the canonical textual
/// value, and a human label.
///
/// The value must be parseable back by the owning level definition into an
/// equivalent structured value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SublevelValue {
    /// The sublevel being valued.
    pub def: SublevelDef,
    /// The canonical textual value.
    pub value: String,
    /// The human label.
    pub label: String,
}

impl SublevelValue {
    /// Create a sublevel value.
    pub fn new(def: SublevelDef, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { def, value: value.into(), label: label.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_alphabet() {
        let def = SublevelDef::StringPrefix { position: 0, alpha: false, digits: true };
        let chars = def.allowed_characters();
        assert_eq!(chars.len(), 10);
        assert_eq!(chars.first(), Some(&'0'));
        assert_eq!(chars.last(), Some(&'9'));
        assert!(def.accepts('7'));
        assert!(!def.accepts('A'));
    }

    #[test]
    fn alphanumeric_alphabet_lists_digits_first() {
        let def = SublevelDef::StringPrefix { position: 1, alpha: true, digits: true };
        let chars = def.allowed_characters();
        assert_eq!(chars.len(), 36);
        assert_eq!(chars[0], '0');
        assert_eq!(chars[10], 'A');
        assert!(def.accepts('z'.to_ascii_uppercase()));
    }

    #[test]
    fn non_prefix_sublevels_have_no_alphabet() {
        assert!(SublevelDef::ExactValue.allowed_characters().is_empty());
        assert!(SublevelDef::DatePart(DatePart::Year).allowed_characters().is_empty());
        assert!(!SublevelDef::ExactValue.accepts('A'));
    }
}
