//! A valued level: a definition plus the sublevels assigned so far.

use std::sync::Arc;

use crate::error::ParseError;

use super::def::LevelDef;
use super::sublevel::SublevelValue;

/// One valued level of a collection path.
///
/// The assigned sublevels may be a strict prefix of the definition's
/// sublevel list, in which case the level is *partially valued* and can
/// still be drilled into. The definition is shared, the sublevels are
/// exclusively owned; extension never mutates in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelValue {
    def: Arc<LevelDef>,
    sublevels: Vec<SublevelValue>,
}

impl LevelValue {
    /// Assemble a level value from already-built sublevels.
    ///
    /// The caller must supply at most as many sublevels as the definition
    /// declares; the engine only builds sublevels through
    /// [`LevelDef::parse_sublevels`] or child enumeration, both of which
    /// respect that bound.
    #[must_use]
    pub fn new(def: Arc<LevelDef>, sublevels: Vec<SublevelValue>) -> Self {
        debug_assert!(sublevels.len() <= def.sublevels().len());
        Self { def, sublevels }
    }

    /// Parse a textual repr against a level definition.
    pub fn parse(def: Arc<LevelDef>, repr: &str) -> Result<Self, ParseError> {
        let sublevels = def.parse_sublevels(repr)?;
        Ok(Self { def, sublevels })
    }

    /// The level definition this value instantiates.
    #[must_use]
    pub const fn definition(&self) -> &Arc<LevelDef> {
        &self.def
    }

    /// The sublevel values assigned so far, coarse to fine.
    #[must_use]
    pub fn sublevels(&self) -> &[SublevelValue] {
        &self.sublevels
    }

    /// Render this value back to its textual repr.
    #[must_use]
    pub fn render(&self) -> String {
        self.def.render(&self.sublevels)
    }

    /// Whether every sublevel of the definition has been assigned.
    #[must_use]
    pub fn is_fully_valued(&self) -> bool {
        self.def.is_fully_valued(self.sublevels.len())
    }

    /// The human label of the deepest assigned sublevel.
    #[must_use]
    pub fn deepest_label(&self) -> Option<&str> {
        self.sublevels.last().map(|sub| sub.label.as_str())
    }

    /// A new value with one more sublevel assigned.
    #[must_use]
    pub fn extended(&self, sublevel: SublevelValue) -> Self {
        let mut sublevels = self.sublevels.clone();
        sublevels.push(sublevel);
        Self::new(Arc::clone(&self.def), sublevels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::def::DatePartsLevel;
    use crate::level::granularity::DatePart;
    use crate::property::{Property, PropertyType};

    fn day_level() -> Arc<LevelDef> {
        Arc::new(LevelDef::DateParts(DatePartsLevel::new(
            Property::new("acquired", PropertyType::Datetime),
            DatePart::Day,
        )))
    }

    #[test]
    fn parse_then_render_is_identity() {
        let value = LevelValue::parse(day_level(), "2020-02").expect("parse");
        assert_eq!(value.render(), "2020-02");
        assert!(!value.is_fully_valued());
        assert_eq!(value.deepest_label(), Some("acquired=2020-02"));
    }

    #[test]
    fn extended_leaves_original_untouched() {
        let value = LevelValue::parse(day_level(), "2020").expect("parse");
        let deeper = value.extended(crate::level::SublevelValue::new(
            crate::level::SublevelDef::DatePart(DatePart::Month),
            "2020-02",
            "acquired=2020-02",
        ));
        assert_eq!(value.sublevels().len(), 1);
        assert_eq!(deeper.sublevels().len(), 2);
        assert_eq!(deeper.render(), "2020-02");
    }
}
