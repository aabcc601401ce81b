//! TOML configuration: document options and the resource registry
//!
//! ```toml
//! show_version_info = true
//! collection_check = "first-element"
//! nested_sideload = true
//! default_page_limit = 20
//!
//! [limits]
//! max_depth = 32
//!
//! [[resources]]
//! type_name = "Article"
//! resource_type = "articles"
//!
//! [[resources.relationships]]
//! name = "author"
//! included_by_default = true
//! target = "people"
//! ```

use japi_format::{
    CollectionCheck, DocumentConfig, JapiError, Limits, ResourceDescriptor, ResourceRegistry,
    Result,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

fn default_true() -> bool {
    true
}

fn default_page_limit() -> u64 {
    20
}

/// Optional overrides of the default limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum typed-object nesting depth
    pub max_depth: Option<usize>,
    /// Maximum number of sideloaded resources per document
    pub max_included: Option<usize>,
}

/// A resource descriptor registered under a declared type name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceEntry {
    /// Declared type name used for registry lookups
    pub type_name: String,
    /// The descriptor itself
    #[serde(flatten)]
    pub descriptor: ResourceDescriptor,
}

/// Application configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Emit the top-level `jsonapi` member
    #[serde(default)]
    pub show_version_info: bool,
    /// Sequence classification strategy
    #[serde(default)]
    pub collection_check: CollectionCheck,
    /// Sideload relationships of nested described objects
    #[serde(default = "default_true")]
    pub nested_sideload: bool,
    /// Page size used when a request does not name one
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u64,
    /// Limit overrides
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Registered resources
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_version_info: false,
            collection_check: CollectionCheck::default(),
            nested_sideload: true,
            default_page_limit: default_page_limit(),
            limits: LimitsConfig::default(),
            resources: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parse a configuration document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| JapiError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text).map_err(|e| match e {
            JapiError::InvalidConfig(reason) => {
                JapiError::InvalidConfig(format!("{}: {reason}", path.display()))
            }
            other => other,
        })?;
        debug!(
            path = %path.display(),
            resources = config.resources.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Validated document configuration
    pub fn document_config(&self) -> Result<DocumentConfig> {
        let defaults = Limits::default();
        let limits = Limits {
            max_depth: self.limits.max_depth.unwrap_or(defaults.max_depth),
            max_included: self.limits.max_included.unwrap_or(defaults.max_included),
        };
        limits.validate()?;

        if self.default_page_limit == 0 {
            return Err(JapiError::InvalidConfig(
                "default_page_limit must be at least 1".to_string(),
            ));
        }

        Ok(DocumentConfig {
            show_version_info: self.show_version_info,
            collection_check: self.collection_check,
            nested_sideload: self.nested_sideload,
            limits,
        })
    }

    /// Build and validate the resource registry
    pub fn registry(&self) -> Result<ResourceRegistry> {
        self.resources
            .iter()
            .fold(ResourceRegistry::builder(), |builder, entry| {
                builder.register(entry.type_name.clone(), entry.descriptor.clone())
            })
            .build()
    }
}
