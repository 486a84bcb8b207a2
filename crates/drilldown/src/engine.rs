//! The catalog browser engine.
//!
//! Ties the pieces together: builds the partition schema from property
//! configuration once, then answers the browse operations: parse and render
//! resumable paths, label them, scope queries with criteria, and expand a
//! path into its children against the live index.

use std::sync::Arc;

use drilldown_core::level::parse_level;
use drilldown_core::path::{parse_path, render_path};
use drilldown_core::{CollectionDef, CollectionValue, ConfigError, ParseError, Property};
use drilldown_query::{
    build_criterion, collection_criterion, next_children, CatalogItem, Criterion, QueryError,
    SearchIndex, SearchRequest,
};
use tracing::debug;

use crate::token;

/// Default page size for item listings under a collection.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// A browsable view of a flat catalog as a tree of synthetic collections.
///
/// The schema is built once from the configured properties and never
/// mutated; paths derived from it are immutable values, so a browser can be
/// shared and queried concurrently.
pub struct CatalogBrowser {
    properties: Vec<Property>,
    definition: CollectionDef,
    index: Arc<dyn SearchIndex>,
}

impl CatalogBrowser {
    /// Build a browser from property configuration and an index binding.
    ///
    /// Properties carrying a partition level take part in the tree, ordered
    /// by their level position; the rest are only available to search
    /// criteria. Malformed partition formats surface here, at schema-build
    /// time, never at query time.
    pub fn new(
        properties: Vec<Property>,
        index: Arc<dyn SearchIndex>,
    ) -> Result<Self, ConfigError> {
        let mut partitioned: Vec<&Property> =
            properties.iter().filter(|p| p.level.is_some()).collect();
        partitioned.sort_by_key(|p| p.level);
        for pair in partitioned.windows(2) {
            if pair[0].level == pair[1].level {
                return Err(ConfigError::DuplicateLevelPosition {
                    position: pair[0].level.unwrap_or_default(),
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        let levels = partitioned
            .into_iter()
            .map(parse_level)
            .collect::<Result<Vec<_>, ConfigError>>()?;
        debug!(levels = levels.len(), "partition schema built");
        Ok(Self { properties, definition: CollectionDef::new(levels), index })
    }

    /// The partition schema.
    #[must_use]
    pub const fn definition(&self) -> &CollectionDef {
        &self.definition
    }

    /// The configured properties.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The root of the browse tree.
    #[must_use]
    pub fn root(&self) -> CollectionValue {
        CollectionValue::root(self.definition.clone())
    }

    /// Parse a textual path into a browse position.
    pub fn parse_path(&self, path: &str) -> Result<CollectionValue, ParseError> {
        parse_path(&self.definition, path)
    }

    /// Render a browse position to its textual path.
    #[must_use]
    pub fn render_path(&self, value: &CollectionValue) -> String {
        render_path(value)
    }

    /// The human label of a browse position.
    #[must_use]
    pub fn label(&self, value: &CollectionValue) -> String {
        value.label()
    }

    /// The backend filter selecting exactly the items under a position.
    pub fn criterion(&self, value: &CollectionValue) -> Result<Criterion, QueryError> {
        collection_criterion(value)
    }

    /// The backend filter of a free search request over the configured
    /// properties.
    #[must_use]
    pub fn search_criterion(&self, request: &SearchRequest) -> Criterion {
        build_criterion(&self.properties, request)
    }

    /// The child positions of a browse position that actually occur in the
    /// data. Empty when the position is a leaf.
    pub fn children(&self, value: &CollectionValue) -> Result<Vec<CollectionValue>, QueryError> {
        next_children(self.index.as_ref(), value)
    }

    /// A page of the items under a browse position.
    pub fn items(
        &self,
        value: &CollectionValue,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, QueryError> {
        let criterion = self.criterion(value)?;
        Ok(self.index.search(&criterion, limit)?)
    }

    /// The opaque resumable token of a browse position.
    #[must_use]
    pub fn token(&self, value: &CollectionValue) -> String {
        token::encode(&self.render_path(value))
    }

    /// Resume a browse position from a token.
    pub fn parse_token(&self, text: &str) -> Result<CollectionValue, ParseError> {
        let path = token::decode(text)?;
        self.parse_path(&path)
    }
}
