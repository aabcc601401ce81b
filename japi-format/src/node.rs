//! Object graph consumed by the generic serializer
//!
//! A [`Node`] tree stands in for the application's runtime values. Typed
//! values ([`ObjectNode`]) carry the declared type name the registry is keyed
//! by; untyped mappings and sequences are plain containers.
//!
//! The JSON form marks typed objects with `"$type"` and paginated
//! representations with `"$paginated"`:
//!
//! ```json
//! {"$type": "Article", "id": "5", "title": "Hello"}
//! {"$paginated": {"items": [], "offset": 0, "limit": 10, "total_results": 0,
//!                 "route": "/articles?page[offset]={offset}&page[limit]={limit}"}}
//! ```

use crate::constants::{NODE_PAGINATED_KEY, NODE_TYPE_KEY};
use crate::error::{JapiError, Result};
use serde_json::{Map, Number, Value};

/// A value in the object graph
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Number(Number),
    /// String value
    String(String),
    /// Ordered sequence
    Sequence(Vec<Node>),
    /// Untyped ordered mapping
    Map(Vec<(String, Node)>),
    /// Typed value with a declared runtime type
    Object(ObjectNode),
    /// Offset-paginated slice of a collection
    Paginated(Box<OffsetPaginated>),
}

/// Typed value: a declared type name plus its fields in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    /// Runtime type identifier used for registry lookups
    pub type_name: String,
    /// Fields in visitation order
    pub fields: Vec<(String, Node)>,
}

impl ObjectNode {
    /// Create a typed value with no fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// One page of a collection together with the data needed to link to other pages
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetPaginated {
    /// Items on this page
    pub items: Vec<Node>,
    /// Offset of the first item
    pub offset: u64,
    /// Page size
    pub limit: u64,
    /// Size of the whole collection
    pub total_results: u64,
    /// URI template with `{offset}`, `{limit}` and `{page}` placeholders
    pub route: String,
}

impl OffsetPaginated {
    /// URI for a one-based page number
    pub fn uri_for_page(&self, page: u64) -> String {
        let offset = page.saturating_sub(1).saturating_mul(self.limit);
        self.route
            .replace("{offset}", &offset.to_string())
            .replace("{limit}", &self.limit.to_string())
            .replace("{page}", &page.to_string())
    }
}

impl Node {
    /// Build an untyped mapping from key/value pairs
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Member of an untyped mapping or typed value
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            Node::Object(object) => object
                .fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Declared type name of a typed value
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Node::Object(object) => Some(object.type_name.as_str()),
            _ => None,
        }
    }

    /// Build a graph from its JSON form
    pub fn from_json(value: &Value) -> Result<Node> {
        from_json_at(value, "")
    }
}

impl From<ObjectNode> for Node {
    fn from(object: ObjectNode) -> Self {
        Node::Object(object)
    }
}

impl From<OffsetPaginated> for Node {
    fn from(paginated: OffsetPaginated) -> Self {
        Node::Paginated(Box::new(paginated))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(value.into())
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Number(value.into())
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

fn from_json_at(value: &Value, path: &str) -> Result<Node> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(*b),
        Value::Number(n) => Node::Number(n.clone()),
        Value::String(s) => Node::String(s.clone()),
        Value::Array(items) => Node::Sequence(
            items
                .iter()
                .enumerate()
                .map(|(idx, item)| from_json_at(item, &format!("{path}/{idx}")))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Object(map) => {
            if let Some(paginated) = map.get(NODE_PAGINATED_KEY) {
                let pointer = format!("{path}/{}", escape_token(NODE_PAGINATED_KEY));
                paginated_from_json(paginated, &pointer)?.into()
            } else if let Some(type_name) = map.get(NODE_TYPE_KEY) {
                let type_name = type_name.as_str().ok_or_else(|| JapiError::InvalidGraph {
                    path: format!("{path}/{}", escape_token(NODE_TYPE_KEY)),
                    reason: "type marker must be a string".to_string(),
                })?;
                Node::Object(ObjectNode {
                    type_name: type_name.to_string(),
                    fields: fields_from_json(map, path, true)?,
                })
            } else {
                Node::Map(fields_from_json(map, path, false)?)
            }
        }
    })
}

fn fields_from_json(
    map: &Map<String, Value>,
    path: &str,
    skip_type_marker: bool,
) -> Result<Vec<(String, Node)>> {
    map.iter()
        .filter(|(key, _)| !(skip_type_marker && key.as_str() == NODE_TYPE_KEY))
        .map(|(key, value)| {
            let child = from_json_at(value, &format!("{path}/{}", escape_token(key)))?;
            Ok((key.clone(), child))
        })
        .collect()
}

fn paginated_from_json(value: &Value, path: &str) -> Result<OffsetPaginated> {
    let invalid = |reason: &str| JapiError::InvalidGraph {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let map = value
        .as_object()
        .ok_or_else(|| invalid("paginated representation must be an object"))?;

    let items = match map.get("items") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| from_json_at(item, &format!("{path}/items/{idx}")))
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(invalid("'items' must be an array")),
        None => return Err(invalid("missing 'items'")),
    };

    let read_u64 = |key: &str, default: Option<u64>| -> Result<u64> {
        match map.get(key) {
            Some(value) => value
                .as_u64()
                .ok_or_else(|| invalid(&format!("'{key}' must be a non-negative integer"))),
            None => default.ok_or_else(|| invalid(&format!("missing '{key}'"))),
        }
    };

    let limit = read_u64("limit", None)?;
    let offset = read_u64("offset", Some(0))?;
    let total_results = read_u64("total_results", Some(items.len() as u64))?;
    let route = match map.get("route") {
        Some(Value::String(route)) => route.clone(),
        Some(_) => return Err(invalid("'route' must be a string")),
        None => String::new(),
    };

    Ok(OffsetPaginated {
        items,
        offset,
        limit,
        total_results,
        route,
    })
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
