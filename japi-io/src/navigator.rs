//! Generic field-by-field graph serializer
//!
//! Walks a [`Node`] graph depth-first and reports every typed object to a
//! [`DocumentVisitor`] after its fields were serialized. Untyped mappings and
//! sequences do not count towards the depth; only typed objects do.

use japi_codec::{DocumentVisitor, PaginationEnvelopeBuilder, VisitContext};
use japi_format::{JapiError, Node, Result, SerializedNode};
use serde_json::Value;

/// Drives one serialization pass over an object graph
#[derive(Debug, Clone)]
pub struct GraphNavigator<'g> {
    groups: &'g [String],
    max_depth: usize,
}

impl<'g> GraphNavigator<'g> {
    /// Create a navigator with the active serialization groups and a depth limit
    pub fn new(groups: &'g [String], max_depth: usize) -> Self {
        Self { groups, max_depth }
    }

    /// Run a complete pass: prepare, traverse, record the root and finish
    pub fn serialize<V>(&self, visitor: &mut V, root: Node) -> Result<Value>
    where
        V: DocumentVisitor + ?Sized,
    {
        let prepared = visitor.prepare(root);
        let value = self.accept(visitor, &prepared, 0)?;
        visitor.set_root(value);
        visitor.result()
    }

    /// Serialize one node at the given typed-object depth
    pub fn accept<V>(&self, visitor: &mut V, node: &Node, depth: usize) -> Result<Value>
    where
        V: DocumentVisitor + ?Sized,
    {
        match node {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(*b)),
            Node::Number(n) => Ok(Value::Number(n.clone())),
            Node::String(s) => Ok(Value::String(s.clone())),
            Node::Sequence(items) => self.accept_items(visitor, items, depth),
            Node::Map(entries) => {
                let mut map = SerializedNode::new();
                for (key, value) in entries {
                    map.insert(key.clone(), self.accept(visitor, value, depth)?);
                }
                Ok(Value::Object(map))
            }
            Node::Object(object) => {
                if depth >= self.max_depth {
                    return Err(JapiError::LimitExceeded(format!(
                        "object '{}' nested deeper than {} levels",
                        object.type_name, self.max_depth
                    )));
                }

                let mut fields = SerializedNode::new();
                for (key, value) in &object.fields {
                    fields.insert(key.clone(), self.accept(visitor, value, depth + 1)?);
                }

                let ctx = VisitContext {
                    depth,
                    groups: self.groups,
                };
                visitor.end_visiting_object(&object.type_name, fields, &ctx)
            }
            Node::Paginated(representation) => {
                PaginationEnvelopeBuilder::serialize(visitor, representation, |visitor, items| {
                    self.accept_items(visitor, items, depth)
                })
            }
        }
    }

    fn accept_items<V>(&self, visitor: &mut V, items: &[Node], depth: usize) -> Result<Value>
    where
        V: DocumentVisitor + ?Sized,
    {
        items
            .iter()
            .map(|item| self.accept(visitor, item, depth))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}
