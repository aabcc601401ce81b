//! Error types for JAPI

use thiserror::Error;

/// JAPI error types
#[derive(Debug, Error)]
pub enum JapiError {
    /// A descriptor was registered under a type name that is already taken.
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),
    /// A descriptor or registry entry is missing a required value.
    #[error("Invalid descriptor for '{type_name}': {reason}")]
    InvalidDescriptor {
        /// Type name the descriptor was registered under
        type_name: String,
        /// Explanation of why the descriptor is invalid
        reason: String,
    },
    /// A relationship points at a resource type no descriptor declares.
    #[error("Unknown relationship target '{target}' on '{type_name}.{relationship}'")]
    UnknownRelationshipTarget {
        /// Type name owning the relationship
        type_name: String,
        /// Relationship name
        relationship: String,
        /// Declared target resource type
        target: String,
    },
    /// The object graph could not be built from its JSON form.
    #[error("Invalid object graph at '{path}': {reason}")]
    InvalidGraph {
        /// JSON Pointer to the offending value
        path: String,
        /// Explanation of what is wrong
        reason: String,
    },
    /// A configured limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// Configuration exceeds hard limits or is otherwise unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// I/O operation failed while reading or writing data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, JapiError>;
