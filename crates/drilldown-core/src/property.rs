//! Catalog property descriptors eligible for partitioning.

use serde::{Deserialize, Serialize};

/// The declared type of a catalog item property.
///
/// The type drives which branch of the level-definition parser applies:
/// string properties can be partitioned by prefix, numeric properties by
/// range buckets, datetime properties by date parts, and everything else
/// falls back to exact-value grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyType {
    /// Free text.
    String,
    /// A plain number.
    Number,
    /// A number carrying an angle unit.
    Angle,
    /// A number carrying a length unit.
    Length,
    /// A number in percent.
    Percentage,
    /// A UTC timestamp.
    Datetime,
    /// A boolean flag.
    Boolean,
    /// A URL.
    Url,
    /// An opaque JSON object.
    Json,
}

impl PropertyType {
    /// Returns `true` for the numeric kinds (number, angle, length, percentage).
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Number | Self::Angle | Self::Length | Self::Percentage)
    }

    /// Returns `true` if the property holds timestamps.
    #[inline]
    #[must_use]
    pub const fn is_datetime(self) -> bool {
        matches!(self, Self::Datetime)
    }

    /// Returns `true` if the property holds free text.
    #[inline]
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::String)
    }
}

/// A catalog property that may take part in the partition hierarchy.
///
/// The name doubles as the field path under which the search backend indexes
/// the property. A property participates in the browse tree only when it
/// carries a `level` position; the optional `format` string configures how
/// that level is partitioned (see [`crate::level::parse_level`]).
///
/// # Example
///
/// ```
/// use drilldown_core::{Property, PropertyType};
///
/// let cloud = Property::new("cloud_cover", PropertyType::Percentage)
///     .with_format("0;10;20")
///     .with_level(1);
/// assert!(cloud.kind.is_numeric());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// The property name, also used as the index field path.
    pub name: String,
    /// The declared type.
    pub kind: PropertyType,
    /// The partition format string, if configured.
    pub format: Option<String>,
    /// The position of this property in the partition hierarchy, if any.
    pub level: Option<u32>,
}

impl Property {
    /// Create a property with no partition configuration.
    pub fn new(name: impl Into<String>, kind: PropertyType) -> Self {
        Self { name: name.into(), kind, format: None, level: None }
    }

    /// Set the partition format string.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the position in the partition hierarchy.
    #[must_use]
    pub const fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }
}
