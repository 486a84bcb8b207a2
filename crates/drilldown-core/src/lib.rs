//! Drilldown Core
//!
//! This crate provides the data model for the drilldown partitioning engine:
//! everything needed to describe a browsable tree of synthetic collections
//! over a flat catalog, without touching a search backend.
//!
//! # Overview
//!
//! A catalog [`Property`] (a name plus a declared [`PropertyType`]) can be
//! configured with a partition format string. The [`level::parse_level`]
//! parser turns that configuration into a [`LevelDef`]: one dimension of the
//! browse tree, partitioned by date parts, numeric buckets, string prefixes
//! or exact values. An ordered list of level definitions forms a
//! [`CollectionDef`], the fixed schema of the whole tree, and a
//! [`CollectionValue`] is one concrete path from the root, built one
//! [`SublevelValue`] at a time.
//!
//! Every level value has a canonical textual representation that survives a
//! round-trip through [`LevelDef::parse_sublevels`] and rendering; the
//! [`path`] module extends this to whole paths (`name=repr` segments joined
//! by `/`), which is the only encoding clients need to persist to resume
//! browsing.
//!
//! # Example
//!
//! ```
//! use drilldown_core::{CollectionDef, CollectionValue, Property, PropertyType};
//! use drilldown_core::level::parse_level;
//! use drilldown_core::path::{parse_path, render_path};
//!
//! let acquired = Property::new("acquired", PropertyType::Datetime).with_format("DAY");
//! let def = CollectionDef::new(vec![parse_level(&acquired)?]);
//!
//! let value = parse_path(&def, "acquired=2020-02")?;
//! assert!(!value.is_fully_valued());
//! assert_eq!(render_path(&value), "acquired=2020-02");
//! assert_eq!(value.label(), "acquired=2020-02");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`property`] - Catalog property descriptors ([`Property`], [`PropertyType`])
//! - [`level`] - Level/sublevel definitions, values and the format parser
//! - [`tree`] - Collection definition and collection value
//! - [`path`] - Textual path codec
//! - [`error`] - Error types ([`ConfigError`], [`ParseError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod level;
pub mod path;
pub mod property;
pub mod tree;

// Re-export commonly used types
pub use error::{ConfigError, ParseError};
pub use level::{DatePart, LevelDef, LevelValue, SublevelDef, SublevelValue};
pub use property::{Property, PropertyType};
pub use tree::{CollectionDef, CollectionValue};
