//! Error types for the core crate.

use thiserror::Error;

use crate::level::DatePart;

/// Errors surfaced while building a partition schema from configuration.
///
/// Only formats that are recognized as belonging to a grammar but are
/// malformed end up here; an absent or unrecognized format degrades to an
/// exact-value level instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric breakpoint list was recognized but malformed.
    #[error("invalid number format {format:?} for property {property}: {reason}")]
    InvalidNumberFormat {
        /// The property carrying the format.
        property: String,
        /// The offending format string.
        format: String,
        /// What made the list malformed.
        reason: String,
    },

    /// Two properties claim the same position in the partition hierarchy.
    #[error("properties {first} and {second} both declare partition level {position}")]
    DuplicateLevelPosition {
        /// The contested position.
        position: u32,
        /// The property that claimed it first.
        first: String,
        /// The property that claimed it second.
        second: String,
    },
}

/// Errors surfaced while parsing a textual representation back into values.
///
/// Parse failures are total: a malformed repr is rejected, never partially
/// accepted or silently truncated.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An empty repr was given for a level.
    #[error("empty level value")]
    EmptyValue,

    /// A date component did not parse as an integer.
    #[error("invalid {part} component {token:?} in {repr:?}")]
    InvalidDateComponent {
        /// The full repr being parsed.
        repr: String,
        /// The granularity the token was matched against.
        part: DatePart,
        /// The offending token.
        token: String,
    },

    /// A date component parsed but is out of range for its granularity.
    #[error("{part} component {value} out of range in {repr:?}")]
    DateComponentOutOfRange {
        /// The full repr being parsed.
        repr: String,
        /// The granularity the value was matched against.
        part: DatePart,
        /// The offending value.
        value: i64,
    },

    /// More date components were supplied than the level defines.
    #[error("too many date components in {repr:?}: at most {max} allowed")]
    TooManyDateComponents {
        /// The full repr being parsed.
        repr: String,
        /// The number of sublevels the level defines.
        max: usize,
    },

    /// A number-range repr matched none of the three accepted shapes.
    #[error("invalid number range {repr:?}: expected \"<max\", \"min;max\" or \">min\"")]
    InvalidNumberRange {
        /// The offending repr.
        repr: String,
    },

    /// A prefix repr is longer than the configured number of positions.
    #[error("prefix value {repr:?} longer than the {max} configured positions")]
    PrefixTooLong {
        /// The offending repr.
        repr: String,
        /// The configured number of sublevels.
        max: usize,
    },

    /// A prefix character is outside the alphabet of its position.
    #[error("character {character:?} at position {position} not allowed in prefix {repr:?}")]
    PrefixCharNotAllowed {
        /// The offending repr.
        repr: String,
        /// The 0-based position of the character.
        position: u32,
        /// The offending character.
        character: char,
    },

    /// A path segment is not of the form `name=repr`.
    #[error("malformed path segment {segment:?}: expected name=value")]
    MalformedSegment {
        /// The offending segment.
        segment: String,
    },

    /// A path names a property out of schema order (or not in the schema).
    #[error("unexpected property {found:?} at level {position}: expected {expected:?}")]
    UnexpectedProperty {
        /// The 0-based level position in the path.
        position: usize,
        /// The property the schema defines at this position.
        expected: String,
        /// The property the path named.
        found: String,
    },

    /// A path has more levels than the schema defines.
    #[error("path has more levels than the definition ({max})")]
    TooManyLevels {
        /// The number of levels the schema defines.
        max: usize,
    },

    /// A level other than the last is not fully valued.
    #[error("level {name:?} is not fully valued but a deeper level follows")]
    IncompletePrefix {
        /// The property name of the partially valued level.
        name: String,
    },

    /// A browse token could not be decoded.
    #[error("invalid browse token: {0}")]
    InvalidToken(String),
}
