//! Textual path codec.
//!
//! A path is the client-resumable encoding of a collection value: one
//! `name=repr` segment per valued level, joined by `/`, the empty string
//! being the root. The per-level repr grammar is owned by the level
//! definitions; this module only adds the segment framing, so
//! `render_path(parse_path(def, p)?) == p` holds for any path the engine
//! hands out.

use std::sync::Arc;

use crate::error::ParseError;
use crate::level::LevelValue;
use crate::tree::{CollectionDef, CollectionValue};

/// Render a collection value to its textual path.
#[must_use]
pub fn render_path(value: &CollectionValue) -> String {
    value
        .levels()
        .iter()
        .map(|level| format!("{}={}", level.definition().property().name, level.render()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse a textual path against a schema.
///
/// Segments must name the schema's properties in order, every level but the
/// last must be fully valued, and each repr must conform to its level's
/// grammar. Malformed paths are rejected outright, never partially accepted.
pub fn parse_path(def: &CollectionDef, path: &str) -> Result<CollectionValue, ParseError> {
    if path.is_empty() {
        return Ok(CollectionValue::root(def.clone()));
    }

    let mut levels = Vec::new();
    for (position, segment) in path.split('/').enumerate() {
        let (name, repr) = segment
            .split_once('=')
            .ok_or_else(|| ParseError::MalformedSegment { segment: segment.to_owned() })?;
        let Some(level_def) = def.level(position) else {
            return Err(ParseError::TooManyLevels { max: def.len() });
        };
        let expected = &level_def.property().name;
        if expected != name {
            return Err(ParseError::UnexpectedProperty {
                position,
                expected: expected.clone(),
                found: name.to_owned(),
            });
        }
        levels.push(LevelValue::parse(Arc::clone(level_def), repr)?);
    }
    CollectionValue::new(def.clone(), levels)
}
