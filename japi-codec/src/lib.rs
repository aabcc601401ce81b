//! JAPI Codec - JSON-API document assembly
//!
//! This crate turns the output of a generic field-by-field serializer into a
//! JSON-API compound document. A serializer drives one [`DocumentBuilder`] per
//! pass through the [`DocumentVisitor`] callbacks:
//!
//! 1. [`DocumentVisitor::prepare`] once with the root value
//! 2. [`DocumentVisitor::end_visiting_object`] once per typed object, post-order
//! 3. [`DocumentVisitor::set_root`] with the serialized root
//! 4. [`DocumentVisitor::result`] once to obtain the finished document
//!
//! Paginated representations are routed through
//! [`PaginationEnvelopeBuilder::serialize`] while traversal is in progress.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod classifier;
pub mod finalizer;
pub mod includer;
pub mod pagination;

pub use builder::DocumentBuilder;
pub use classifier::ResourceClassifier;
pub use finalizer::DocumentFinalizer;
pub use includer::RelationshipIncluder;
pub use pagination::PaginationEnvelopeBuilder;

// Re-export commonly used types
pub use japi_format::{
    Classification, CollectionCheck, Document, DocumentConfig, JapiError, Limits, Node,
    ObjectNode, OffsetPaginated, ResourceRegistry, Result, SerializedNode,
};

use japi_format::constants::SIDELOAD_GROUP;
use serde_json::Value;

/// Position of the object currently being visited
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'a> {
    /// Number of typed objects enclosing the visited one; zero for top-level values
    pub depth: usize,
    /// Serialization groups active for this pass
    pub groups: &'a [String],
}

impl<'a> VisitContext<'a> {
    /// Context for a top-level object
    pub fn top_level(groups: &'a [String]) -> Self {
        Self { depth: 0, groups }
    }

    /// Whether `group` is active
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Whether the active groups disable sideloading
    pub fn sideload_disabled(&self) -> bool {
        self.has_group(SIDELOAD_GROUP)
    }
}

/// Callbacks a generic serializer invokes during one serialization pass
pub trait DocumentVisitor {
    /// Inspect the root value before traversal; returns the value to traverse
    fn prepare(&mut self, root: Node) -> Node;

    /// Whether this pass produces a JSON-API document
    fn is_document(&self) -> bool;

    /// In-progress document, available while a document pass is running
    fn document_mut(&mut self) -> Option<&mut Document>;

    /// Called after all fields of a typed object were serialized; returns the
    /// value that replaces the object in the serialized output
    fn end_visiting_object(
        &mut self,
        type_name: &str,
        fields: SerializedNode,
        ctx: &VisitContext<'_>,
    ) -> Result<Value>;

    /// Record the serialized root produced by the traversal
    fn set_root(&mut self, root: Value);

    /// Finish the pass
    fn result(&mut self) -> Result<Value>;
}
