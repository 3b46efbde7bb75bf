//! Resource records as seen by the query layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored resource.
///
/// The query layer treats records as opaque apart from the identifier, the
/// display label, and a flat map of attributes that predicates can address.
/// `id` and `label` are addressable as attributes of the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// The resource type (e.g., "site").
    pub resource_type: String,

    /// The record identifier, unique within its resource type.
    pub id: String,

    /// Human-readable display label.
    pub label: String,

    /// Filterable attributes.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceRecord {
    /// Creates a record with no attributes.
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            label: label.into(),
            attributes: Map::new(),
        }
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Returns a stored attribute.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the value a predicate on `name` compares against.
    ///
    /// `id` and `label` resolve to the record's own columns.
    pub fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "label" => Some(Value::String(self.label.clone())),
            _ => self.attributes.get(name).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_virtual_columns() {
        let record = ResourceRecord::new("site", "site-1", "Site One")
            .with_attribute("region_id", "region-42");

        assert_eq!(record.field_value("id"), Some(json!("site-1")));
        assert_eq!(record.field_value("label"), Some(json!("Site One")));
        assert_eq!(record.field_value("region_id"), Some(json!("region-42")));
        assert_eq!(record.field_value("missing"), None);
    }

    #[test]
    fn test_deserialize_without_attributes() {
        let record: ResourceRecord =
            serde_json::from_value(json!({"resource_type": "region", "id": "r1", "label": "R1"}))
                .unwrap();
        assert!(record.attributes.is_empty());
    }
}
