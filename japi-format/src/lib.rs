//! JAPI Format - Core primitives for JSON-API document assembly
//!
//! This crate provides the data model shared by the assembly transform and the
//! outer surfaces, with no traversal logic. It includes:
//!
//! - Reserved keys and protocol constants
//! - Resource and relationship descriptors
//! - The validated resource registry
//! - The object graph consumed by the generic serializer
//! - Resource object and document types
//! - Error types
//! - Pass configuration and limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod limits;
pub mod node;
pub mod registry;

// Re-export commonly used types
pub use config::{CollectionCheck, DocumentConfig};
pub use descriptor::{RelationshipDescriptor, ResourceDescriptor};
pub use document::{Document, JsonApiVersion, ResourceKey, ResourceObject};
pub use error::{JapiError, Result};
pub use limits::Limits;
pub use node::{Node, ObjectNode, OffsetPaginated};
pub use registry::{RegistryBuilder, ResourceRegistry};

/// Generic ordered key/value mapping produced by the serializer for one visited object
pub type SerializedNode = serde_json::Map<String, serde_json::Value>;

/// Outcome of classifying a value before traversal begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A single value with a registered resource descriptor
    Resource,
    /// A container of resources (or an empty container, which cannot be identified)
    /// or a paginated representation
    Collection,
    /// A single value without a descriptor; wrapped as primary data unchanged
    Scalar,
    /// An envelope mapping that already carries document-shaped `data`
    Document,
    /// A non-empty container of plain values, rendered without a JSON-API envelope
    Plain,
}

impl Classification {
    /// Whether a pass over a value of this shape produces a JSON-API document
    pub fn is_document(&self) -> bool {
        !matches!(self, Classification::Plain)
    }
}
