//! Resource objects and top-level documents

use crate::constants::{
    JSONAPI_VERSION, KEY_ATTRIBUTES, KEY_ERRORS, KEY_ID, KEY_LINKS, KEY_RELATIONSHIPS, KEY_TYPE,
};
use crate::error::Result;
use crate::SerializedNode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity of a resource: its type plus the textual form of its id
///
/// Ids compare by text, so `"9"` and `9` identify the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    /// Resource type
    pub resource_type: String,
    /// Identifier text
    pub id: String,
}

impl ResourceKey {
    /// Key for a type and an id value; `None` when the id is null
    pub fn new(resource_type: &str, id: &Value) -> Option<Self> {
        let id = match id {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Some(Self {
            resource_type: resource_type.to_string(),
            id,
        })
    }

    /// Key of a rendered resource object value
    pub fn of(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let resource_type = map.get(KEY_TYPE)?.as_str()?;
        Self::new(resource_type, map.get(KEY_ID)?)
    }

    /// Keys of the resource objects in primary data, single or collection
    pub fn all_in(data: &Value) -> Vec<Self> {
        match data {
            Value::Array(items) => items.iter().filter_map(Self::of).collect(),
            single @ Value::Object(_) => Self::of(single).into_iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// A resource object: the unit of primary and included data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// JSON-API `type` member
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Identifier; null when the resource has none
    #[serde(default)]
    pub id: Value,
    /// Attributes in visitation order
    #[serde(default)]
    pub attributes: SerializedNode,
    /// Relationships object carried through from serialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<SerializedNode>,
    /// Resource-level links carried through from serialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<SerializedNode>,
}

impl ResourceObject {
    /// Identity of this resource
    pub fn key(&self) -> Option<ResourceKey> {
        ResourceKey::new(&self.resource_type, &self.id)
    }

    /// Render as an ordered JSON object
    pub fn into_value(self) -> Value {
        let mut map = SerializedNode::new();
        map.insert(KEY_TYPE.to_string(), Value::String(self.resource_type));
        map.insert(KEY_ID.to_string(), self.id);
        map.insert(KEY_ATTRIBUTES.to_string(), Value::Object(self.attributes));
        if let Some(relationships) = self.relationships {
            map.insert(KEY_RELATIONSHIPS.to_string(), Value::Object(relationships));
        }
        if let Some(links) = self.links {
            map.insert(KEY_LINKS.to_string(), Value::Object(links));
        }
        Value::Object(map)
    }
}

/// The `jsonapi` member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonApiVersion {
    /// Protocol version
    pub version: String,
}

impl Default for JsonApiVersion {
    fn default() -> Self {
        Self {
            version: JSONAPI_VERSION.to_string(),
        }
    }
}

/// A top-level JSON-API document
///
/// Serializes its members in the order `jsonapi`, `meta`, `links`, `data`,
/// `included`, omitting empty optional members. `data` is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Implementation information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiVersion>,
    /// Non-standard meta information
    #[serde(default, skip_serializing_if = "SerializedNode::is_empty")]
    pub meta: SerializedNode,
    /// Document-level links
    #[serde(default, skip_serializing_if = "SerializedNode::is_empty")]
    pub links: SerializedNode,
    /// Primary data: a resource object, a sequence of them, or null
    #[serde(default)]
    pub data: Value,
    /// Sideloaded resources in first-discovered order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

impl Document {
    /// Document with the given primary data and nothing else
    pub fn with_data(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Parse a rendered document
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Render as an ordered JSON object
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Whether primary data is shaped like an error document
    pub fn is_error_shaped(&self) -> bool {
        self.data
            .as_object()
            .is_some_and(|map| map.contains_key(KEY_ERRORS))
    }

    /// Keys of every resource object in primary data
    pub fn primary_keys(&self) -> Vec<ResourceKey> {
        ResourceKey::all_in(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_key_compares_ids_by_text() {
        let numeric = ResourceKey::new("people", &json!(9)).unwrap();
        let textual = ResourceKey::new("people", &json!("9")).unwrap();
        assert_eq!(numeric, textual);
        assert!(ResourceKey::new("people", &Value::Null).is_none());
    }

    #[test]
    fn resource_object_renders_members_in_order() {
        let mut attributes = SerializedNode::new();
        attributes.insert("title".to_string(), json!("Hello"));
        let resource = ResourceObject {
            resource_type: "articles".to_string(),
            id: json!("5"),
            attributes,
            relationships: None,
            links: None,
        };

        let rendered = serde_json::to_string(&resource.into_value()).unwrap();
        assert_eq!(
            rendered,
            r#"{"type":"articles","id":"5","attributes":{"title":"Hello"}}"#
        );
    }

    #[test]
    fn document_omits_empty_members() {
        let document = Document::with_data(json!([]));
        let value = document.to_value().unwrap();
        assert_eq!(value, json!({"data": []}));
        assert!(value.get(crate::constants::KEY_INCLUDED).is_none());
        assert!(value.get(crate::constants::KEY_JSONAPI).is_none());
    }

    #[test]
    fn document_member_order_is_stable() {
        let mut document = Document::with_data(Value::Null);
        document.jsonapi = Some(JsonApiVersion::default());
        document.links.insert("first".to_string(), json!("/a"));
        document.meta.insert("count".to_string(), json!(0));

        let rendered = serde_json::to_string(&document).unwrap();
        assert_eq!(
            rendered,
            r#"{"jsonapi":{"version":"1.0"},"meta":{"count":0},"links":{"first":"/a"},"data":null}"#
        );
    }

    #[test]
    fn primary_keys_cover_single_and_collection_data() {
        let single = Document::with_data(json!({"type": "articles", "id": "1"}));
        assert_eq!(single.primary_keys().len(), 1);

        let many = Document::with_data(json!([
            {"type": "articles", "id": "1"},
            {"type": "articles", "id": "2"},
            {"type": "articles", "id": null}
        ]));
        assert_eq!(many.primary_keys().len(), 2);
    }

    #[test]
    fn error_shaped_data_is_detected() {
        let document = Document::with_data(json!({"errors": []}));
        assert!(document.is_error_shaped());
        assert!(!Document::with_data(json!([])).is_error_shaped());
    }
}
