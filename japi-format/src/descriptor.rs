//! Resource and relationship descriptors

use serde::{Deserialize, Serialize};

fn default_id_field() -> String {
    "id".to_string()
}

/// Relationship declared by a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    /// Serialized field name holding the related value(s)
    pub name: String,
    /// Sideload related values into `included` without an explicit request
    #[serde(default)]
    pub included_by_default: bool,
    /// Resource type of the related values; falls back to the owner's type when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl RelationshipDescriptor {
    /// Create a relationship that is not sideloaded by default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            included_by_default: false,
            target: None,
        }
    }

    /// Mark the relationship as sideloaded by default
    pub fn included_by_default(mut self) -> Self {
        self.included_by_default = true;
        self
    }

    /// Declare the resource type of the related values
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

/// Describes how values of one declared type map to JSON-API resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// JSON-API `type` member
    pub resource_type: String,
    /// Serialized field supplying the `id` member
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Declared relationships in declaration order
    #[serde(default)]
    pub relationships: Vec<RelationshipDescriptor>,
}

impl ResourceDescriptor {
    /// Create a descriptor with the default `id` field and no relationships
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id_field: default_id_field(),
            relationships: Vec::new(),
        }
    }

    /// Use a different serialized field as the identifier
    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Append a relationship declaration
    pub fn with_relationship(mut self, relationship: RelationshipDescriptor) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Whether `name` is a declared relationship
    pub fn has_relationship(&self, name: &str) -> bool {
        self.relationships.iter().any(|r| r.name == name)
    }

    /// Relationships sideloaded without an explicit request
    pub fn default_includes(&self) -> impl Iterator<Item = &RelationshipDescriptor> {
        self.relationships.iter().filter(|r| r.included_by_default)
    }

    /// Resource type that values of `relationship` carry in `included`
    pub fn included_type<'a>(&'a self, relationship: &'a RelationshipDescriptor) -> &'a str {
        relationship
            .target
            .as_deref()
            .unwrap_or(self.resource_type.as_str())
    }
}
