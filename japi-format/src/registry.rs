//! Resource registry keyed by declared type name
//!
//! The registry is populated and validated once at startup. Lookups during a
//! pass are plain map reads, so one registry can back any number of
//! concurrent passes.

use crate::constants::RESERVED_MEMBER_NAMES;
use crate::descriptor::ResourceDescriptor;
use crate::error::{JapiError, Result};
use std::collections::{HashMap, HashSet};

/// Immutable mapping from declared type names to resource descriptors
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    descriptors: HashMap<String, ResourceDescriptor>,
    /// Resource type -> first type name registered with it
    by_resource_type: HashMap<String, String>,
}

impl ResourceRegistry {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry without any descriptors; every value classifies as plain data
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the descriptor for a declared type name
    pub fn lookup(&self, type_name: &str) -> Option<&ResourceDescriptor> {
        self.descriptors.get(type_name)
    }

    /// Look up the descriptor of the first type registered with a resource type
    pub fn lookup_resource_type(&self, resource_type: &str) -> Option<&ResourceDescriptor> {
        self.by_resource_type
            .get(resource_type)
            .and_then(|type_name| self.descriptors.get(type_name))
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no descriptors are registered
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered type names in lexicographic order
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Collects descriptors and validates them as a whole
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, ResourceDescriptor)>,
}

impl RegistryBuilder {
    /// Register a descriptor under a declared type name
    pub fn register(mut self, type_name: impl Into<String>, descriptor: ResourceDescriptor) -> Self {
        self.entries.push((type_name.into(), descriptor));
        self
    }

    /// Validate all entries and freeze the registry
    pub fn build(self) -> Result<ResourceRegistry> {
        let mut descriptors = HashMap::with_capacity(self.entries.len());
        let mut by_resource_type = HashMap::new();

        for (type_name, descriptor) in self.entries {
            validate_descriptor(&type_name, &descriptor)?;
            if descriptors.contains_key(&type_name) {
                return Err(JapiError::DuplicateTypeName(type_name));
            }
            by_resource_type
                .entry(descriptor.resource_type.clone())
                .or_insert_with(|| type_name.clone());
            descriptors.insert(type_name, descriptor);
        }

        let resource_types: HashSet<&str> = descriptors
            .values()
            .map(|d| d.resource_type.as_str())
            .collect();

        for (type_name, descriptor) in &descriptors {
            for relationship in &descriptor.relationships {
                if let Some(target) = &relationship.target {
                    if !resource_types.contains(target.as_str()) {
                        return Err(JapiError::UnknownRelationshipTarget {
                            type_name: type_name.clone(),
                            relationship: relationship.name.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        Ok(ResourceRegistry {
            descriptors,
            by_resource_type,
        })
    }
}

fn validate_descriptor(type_name: &str, descriptor: &ResourceDescriptor) -> Result<()> {
    let invalid = |reason: String| JapiError::InvalidDescriptor {
        type_name: type_name.to_string(),
        reason,
    };

    if type_name.is_empty() {
        return Err(invalid("type name must not be empty".to_string()));
    }
    if descriptor.resource_type.is_empty() {
        return Err(invalid("resource type must not be empty".to_string()));
    }
    if descriptor.id_field.is_empty() {
        return Err(invalid("id field must not be empty".to_string()));
    }

    let mut seen = HashSet::new();
    for relationship in &descriptor.relationships {
        let name = relationship.name.as_str();
        if name.is_empty() {
            return Err(invalid("relationship name must not be empty".to_string()));
        }
        if name == descriptor.id_field {
            return Err(invalid(format!(
                "relationship '{name}' shadows the id field"
            )));
        }
        if RESERVED_MEMBER_NAMES.contains(&name) {
            return Err(invalid(format!(
                "relationship '{name}' uses a reserved member name"
            )));
        }
        if !seen.insert(name) {
            return Err(invalid(format!("relationship '{name}' declared twice")));
        }
    }

    Ok(())
}
