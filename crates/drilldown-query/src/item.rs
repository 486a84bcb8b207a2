//! Catalog item documents as the search backend sees them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A catalog item document: the unit the search backend indexes and the
/// criterion model evaluates against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique item identifier.
    pub id: String,
    /// Identifiers of the stored collections the item belongs to.
    pub collections: Vec<String>,
    /// Spatial extent as `[min_x, min_y, max_x, max_y]`, if any.
    pub bbox: Option<[f64; 4]>,
    /// GeoJSON geometry, if any.
    pub geometry: Option<JsonValue>,
    /// Indexed properties, nested objects addressed with dot paths.
    pub properties: Map<String, JsonValue>,
}

impl CatalogItem {
    /// Create an item with the given identifier and nothing else.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Self::default() }
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a collection membership.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collections.push(collection.into());
        self
    }

    /// Set the spatial extent.
    #[must_use]
    pub const fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Look up a property by dot path (`"meta.author"`).
    #[must_use]
    pub fn property(&self, path: &str) -> Option<&JsonValue> {
        let mut parts = path.split('.');
        let mut current = self.properties.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Resolve a criterion field against this item.
    ///
    /// `"id"` and `"collections"` address the item's envelope; everything
    /// else is a property dot path.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<JsonValue> {
        match field {
            "id" => Some(JsonValue::String(self.id.clone())),
            "collections" => Some(JsonValue::Array(
                self.collections.iter().cloned().map(JsonValue::String).collect(),
            )),
            _ => self.property(field).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_property_lookup() {
        let mut item = CatalogItem::new("item-1");
        item.properties.insert("meta".into(), json!({"author": "carol"}));
        assert_eq!(item.property("meta.author"), Some(&json!("carol")));
        assert_eq!(item.property("meta.missing"), None);
    }

    #[test]
    fn envelope_fields() {
        let item = CatalogItem::new("item-1").with_collection("c1").with_collection("c2");
        assert_eq!(item.field("id"), Some(json!("item-1")));
        assert_eq!(item.field("collections"), Some(json!(["c1", "c2"])));
    }
}
