//! Error types for the query crate.

use thiserror::Error;

use crate::index::IndexError;

/// Errors that can occur while building criteria or enumerating children.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The search backend failed; distinct from an empty result.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// A level value could not be translated into a query constraint.
    #[error("cannot convert level value for property {property}: {reason}")]
    Conversion {
        /// The property whose level value failed to convert.
        property: String,
        /// What went wrong.
        reason: String,
    },
}

impl QueryError {
    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conversion { property: property.into(), reason: reason.into() }
    }
}
