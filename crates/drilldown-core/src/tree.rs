//! Collection definition and collection value.
//!
//! A [`CollectionDef`] is the fixed schema of the whole browse tree: an
//! ordered list of level definitions, built once from configuration and
//! shared read-only by every path derived from it. A [`CollectionValue`] is
//! one concrete path from the root: an ordered list of level values, each a
//! prefix of the schema, extended one sublevel at a time and never mutated
//! in place.

use std::sync::Arc;

use crate::error::ParseError;
use crate::level::{LevelDef, LevelValue, SublevelValue};

/// The fixed schema of the partition hierarchy.
#[derive(Debug, Clone)]
pub struct CollectionDef {
    levels: Vec<Arc<LevelDef>>,
}

impl CollectionDef {
    /// Build a definition from ordered level definitions.
    #[must_use]
    pub fn new(levels: Vec<LevelDef>) -> Self {
        Self { levels: levels.into_iter().map(Arc::new).collect() }
    }

    /// The ordered levels of the hierarchy.
    #[must_use]
    pub fn levels(&self) -> &[Arc<LevelDef>] {
        &self.levels
    }

    /// The level at a position, if any.
    #[must_use]
    pub fn level(&self, position: usize) -> Option<&Arc<LevelDef>> {
        self.levels.get(position)
    }

    /// The number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the hierarchy has no levels at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// One path from the root of the browse tree.
///
/// Level *i* is present only if levels `0..i` are fully valued; the last
/// present level may be partially valued. Extension always produces a new
/// value, so different branches of the tree never alias each other's level
/// lists.
#[derive(Debug, Clone)]
pub struct CollectionValue {
    def: CollectionDef,
    levels: Vec<LevelValue>,
}

impl CollectionValue {
    /// The root path: no level valued yet.
    #[must_use]
    pub const fn root(def: CollectionDef) -> Self {
        Self { def, levels: Vec::new() }
    }

    /// Assemble a path from level values, enforcing the prefix invariant.
    pub fn new(def: CollectionDef, levels: Vec<LevelValue>) -> Result<Self, ParseError> {
        if levels.len() > def.len() {
            return Err(ParseError::TooManyLevels { max: def.len() });
        }
        for (position, level) in levels.iter().enumerate() {
            let expected = def
                .level(position)
                .map(|l| l.property().name.clone())
                .unwrap_or_default();
            let found = level.definition().property().name.clone();
            if expected != found {
                return Err(ParseError::UnexpectedProperty { position, expected, found });
            }
            if position + 1 < levels.len() && !level.is_fully_valued() {
                return Err(ParseError::IncompletePrefix { name: found });
            }
        }
        Ok(Self { def, levels })
    }

    /// The schema this path belongs to.
    #[must_use]
    pub const fn definition(&self) -> &CollectionDef {
        &self.def
    }

    /// The valued levels, root first.
    #[must_use]
    pub fn levels(&self) -> &[LevelValue] {
        &self.levels
    }

    /// Whether the path reaches the finest granularity of every level.
    #[must_use]
    pub fn is_fully_valued(&self) -> bool {
        self.levels.len() == self.def.len()
            && self.levels.iter().all(LevelValue::is_fully_valued)
    }

    /// The partially valued level, if any.
    ///
    /// By the prefix invariant this can only be the last present level.
    #[must_use]
    pub fn first_partially_valued(&self) -> Option<&LevelValue> {
        self.levels.iter().find(|level| !level.is_fully_valued())
    }

    /// The first schema level with no value yet, unless a present level is
    /// still partially valued.
    #[must_use]
    pub fn first_missing_def(&self) -> Option<&Arc<LevelDef>> {
        if self.first_partially_valued().is_some() {
            return None;
        }
        self.def.level(self.levels.len())
    }

    /// A new path with one more level appended.
    #[must_use]
    pub fn with_appended(&self, level: LevelValue) -> Self {
        let mut levels = self.levels.clone();
        levels.push(level);
        Self { def: self.def.clone(), levels }
    }

    /// A new path whose last level gains one more sublevel.
    ///
    /// Returns an unchanged clone when the path has no level yet.
    #[must_use]
    pub fn with_last_extended(&self, sublevel: SublevelValue) -> Self {
        let mut levels = self.levels.clone();
        if let Some(last) = levels.pop() {
            levels.push(last.extended(sublevel));
        }
        Self { def: self.def.clone(), levels }
    }

    /// The parent path: one sublevel less, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let mut levels = self.levels.clone();
        let last = levels.pop()?;
        if last.sublevels().len() > 1 {
            let shallower = LevelValue::new(
                Arc::clone(last.definition()),
                last.sublevels()[..last.sublevels().len() - 1].to_vec(),
            );
            levels.push(shallower);
        }
        Some(Self { def: self.def.clone(), levels })
    }

    /// The human label of the whole path: level labels joined with `" / "`.
    ///
    /// Empty for the root.
    #[must_use]
    pub fn label(&self) -> String {
        self.levels
            .iter()
            .filter_map(LevelValue::deepest_label)
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// The human label of the deepest valued level, if any.
    #[must_use]
    pub fn deepest_label(&self) -> Option<&str> {
        self.levels.last().and_then(LevelValue::deepest_label)
    }
}
