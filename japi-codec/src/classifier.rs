//! Resource vs. plain data classification

use japi_format::constants::KEY_DATA;
use japi_format::{Classification, CollectionCheck, Node, ResourceRegistry};
use tracing::trace;

/// Decides whether values are resources, resource collections or plain data
#[derive(Debug, Clone, Copy)]
pub struct ResourceClassifier<'r> {
    registry: &'r ResourceRegistry,
    check: CollectionCheck,
}

impl<'r> ResourceClassifier<'r> {
    /// Create a classifier backed by `registry`
    pub fn new(registry: &'r ResourceRegistry, check: CollectionCheck) -> Self {
        Self { registry, check }
    }

    /// A typed value whose declared type has a descriptor
    pub fn is_resource(&self, node: &Node) -> bool {
        node.type_name()
            .is_some_and(|type_name| self.registry.lookup(type_name).is_some())
    }

    /// Whether a payload renders as JSON-API primary data
    ///
    /// Only containers are inspected: a non-empty sequence or untyped mapping
    /// of plain values is not a document. An empty container cannot be
    /// identified and counts as a document. With
    /// [`CollectionCheck::FirstElement`] a container is judged by its first
    /// value only; mixed containers are not detected in that mode. Every
    /// other payload, including unregistered objects, scalars, null and
    /// paginated representations, is wrapped as primary data.
    pub fn is_document_shaped(&self, node: &Node) -> bool {
        match node {
            Node::Sequence(items) => self.holds_resources(items.iter()),
            Node::Map(entries) => self.holds_resources(entries.iter().map(|(_, value)| value)),
            _ => true,
        }
    }

    /// Classify a root value before traversal
    pub fn classify(&self, root: &Node) -> Classification {
        let envelope_payload = match root {
            Node::Map(_) => root.get(KEY_DATA),
            _ => None,
        };

        let classification = match envelope_payload {
            Some(payload) if self.is_document_shaped(payload) => Classification::Document,
            Some(_) => Classification::Plain,
            None if !self.is_document_shaped(root) => Classification::Plain,
            None => match root {
                Node::Object(_) if self.is_resource(root) => Classification::Resource,
                Node::Sequence(_) | Node::Map(_) | Node::Paginated(_) => {
                    Classification::Collection
                }
                _ => Classification::Scalar,
            },
        };
        trace!(?classification, "classified root value");
        classification
    }

    fn holds_resources<'n>(&self, mut items: impl Iterator<Item = &'n Node>) -> bool {
        match self.check {
            CollectionCheck::FirstElement => {
                items.next().map_or(true, |first| self.is_resource(first))
            }
            CollectionCheck::EveryElement => items.all(|item| self.is_resource(item)),
        }
    }
}
