//! Drilldown
//!
//! A dynamic collection partitioning engine: present a flat, searchable
//! catalog as a browsable tree of synthetic collections, without ever
//! storing those collections. Each tree level partitions one configured
//! item property (by date parts, numeric buckets, string prefixes or exact
//! values), and a path through the tree is a concrete, re-playable filter.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use drilldown::{CatalogBrowser, CatalogItem, MemoryIndex, Property, PropertyType};
//!
//! let properties = vec![
//!     Property::new("cloud", PropertyType::Percentage)
//!         .with_format("0;10;20")
//!         .with_level(1),
//!     Property::new("acquired", PropertyType::Datetime)
//!         .with_format("DAY")
//!         .with_level(2),
//! ];
//! let index = Arc::new(MemoryIndex::new(vec![CatalogItem::new("item-1")
//!     .with_property("cloud", 5.0)
//!     .with_property("acquired", "2020-02-16T12:30:00Z")]));
//!
//! let browser = CatalogBrowser::new(properties, index)?;
//!
//! // The root offers the configured cloud buckets...
//! let buckets = browser.children(&browser.root())?;
//! assert_eq!(buckets.len(), 4);
//!
//! // ...and a path drills down to the dates that actually occur.
//! let position = browser.parse_path("cloud=0.0;10.0")?;
//! let years = browser.children(&position)?;
//! assert_eq!(browser.render_path(&years[0]), "cloud=0.0;10.0/acquired=2020");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crates
//!
//! - `drilldown-core` - the pure model: properties, level definitions,
//!   collection values, path codec.
//! - `drilldown-query` - the search side: criterion model and builders, the
//!   index port, the next-sublevel helper.
//! - `drilldown` (this crate) - the [`CatalogBrowser`] facade, browse
//!   tokens, and the in-memory index.

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod engine;
pub mod memory;
pub mod token;

// Re-export the API surface of the inner crates
pub use drilldown_core::{
    CollectionDef, CollectionValue, ConfigError, LevelDef, LevelValue, ParseError, Property,
    PropertyType,
};
pub use drilldown_query::{
    CatalogItem, Criterion, IndexError, QueryError, SearchIndex, SearchRequest, ValueCount,
};

pub use engine::{CatalogBrowser, DEFAULT_PAGE_LIMIT};
pub use memory::MemoryIndex;
