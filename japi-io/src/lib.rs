//! JAPI I/O - Graph navigation and high-level APIs
//!
//! This crate provides the outer surfaces around the document assembly
//! transform:
//!
//! - A generic field-by-field graph navigator driving [`DocumentVisitor`]
//! - High-level rendering functions for graphs, JSON values and readers
//! - JSON-API request parameter parsing
//! - Validation error responses
//! - TOML configuration loading

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod inflector;
pub mod navigator;
pub mod request;
pub mod violations;

// Re-export commonly used types
pub use config::AppConfig;
pub use japi_codec::{DocumentBuilder, DocumentVisitor};
pub use japi_format::{DocumentConfig, JapiError, Node, ResourceRegistry, Result};
pub use navigator::GraphNavigator;
pub use request::{JsonApiRequest, SortField};
pub use violations::{error_response, ErrorKey, ErrorResponse, Violation};

use serde_json::Value;
use std::io::Read;
use tracing::debug;

/// High-level rendering options
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Document assembly configuration
    pub config: DocumentConfig,
    /// Serialization groups active for the pass
    pub groups: Vec<String>,
}

impl RenderOptions {
    /// Options with the given document configuration and no active groups
    pub fn new(config: DocumentConfig) -> Self {
        Self {
            config,
            groups: Vec::new(),
        }
    }

    /// Add an active serialization group
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }
}

/// Serialize an object graph, producing a JSON-API document when the root is
/// document-shaped and the plain serialization otherwise
pub fn render(registry: &ResourceRegistry, root: Node, options: &RenderOptions) -> Result<Value> {
    options.config.limits.validate()?;

    let mut builder = DocumentBuilder::new(registry, options.config.clone());
    let navigator = GraphNavigator::new(&options.groups, options.config.limits.max_depth);
    let value = navigator.serialize(&mut builder, root)?;

    debug!(
        classification = ?builder.classification(),
        groups = options.groups.len(),
        "rendered graph"
    );
    Ok(value)
}

/// Render a graph given in its JSON form (`$type` / `$paginated` markers)
pub fn render_json(
    registry: &ResourceRegistry,
    input: &Value,
    options: &RenderOptions,
) -> Result<Value> {
    let root = Node::from_json(input)?;
    render(registry, root, options)
}

/// Read a JSON graph from `reader` and render it
pub fn render_reader<R: Read>(
    registry: &ResourceRegistry,
    reader: R,
    options: &RenderOptions,
) -> Result<Value> {
    let input: Value = serde_json::from_reader(reader)?;
    render_json(registry, &input, options)
}
