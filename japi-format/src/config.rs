//! Per-pass document configuration

use crate::limits::Limits;
use serde::{Deserialize, Serialize};

/// How a non-empty sequence is checked when deciding whether it is a resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionCheck {
    /// Inspect only the first element (O(1), assumes homogeneous collections)
    #[default]
    FirstElement,
    /// Require every element to be a resource
    EveryElement,
}

/// Options controlling how a serialization pass shapes its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConfig {
    /// Emit the top-level `jsonapi` member with the protocol version
    pub show_version_info: bool,
    /// Sequence classification strategy
    pub collection_check: CollectionCheck,
    /// Sideload declared relationships of described objects nested below the top level
    pub nested_sideload: bool,
    /// Traversal limits
    pub limits: Limits,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            show_version_info: false,
            collection_check: CollectionCheck::FirstElement,
            nested_sideload: true,
            limits: Limits::default(),
        }
    }
}

impl DocumentConfig {
    /// Builder-style toggle for the `jsonapi` member
    pub fn with_version_info(mut self, show: bool) -> Self {
        self.show_version_info = show;
        self
    }

    /// Builder-style override of the collection check
    pub fn with_collection_check(mut self, check: CollectionCheck) -> Self {
        self.collection_check = check;
        self
    }

    /// Builder-style toggle for nested sideloading
    pub fn with_nested_sideload(mut self, enabled: bool) -> Self {
        self.nested_sideload = enabled;
        self
    }
}
