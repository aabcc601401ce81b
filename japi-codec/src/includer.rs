//! Sideloading of related resources into `included`

use ahash::AHashSet;
use japi_format::constants::{EXTRA_DATA_KEY, KEY_ID, KEY_LINKS, KEY_RELATIONSHIPS, KEY_TYPE};
use japi_format::{
    Document, JapiError, ResourceDescriptor, ResourceKey, ResourceObject, Result, SerializedNode,
};
use serde_json::Value;
use tracing::trace;

/// Appends related resources to a document's `included` list, once per `(type, id)`
///
/// The first occurrence of a resource wins; later duplicates are dropped
/// without merging their attributes. Entries pushed into `included` by other
/// code are picked up incrementally on the next call.
#[derive(Debug)]
pub struct RelationshipIncluder {
    seen: AHashSet<ResourceKey>,
    tracked: usize,
    max_included: usize,
}

impl RelationshipIncluder {
    /// Create an includer that refuses to grow `included` beyond `max_included` entries
    pub fn new(max_included: usize) -> Self {
        Self {
            seen: AHashSet::new(),
            tracked: 0,
            max_included,
        }
    }

    /// Sideload one serialized related value
    ///
    /// Returns `Ok(true)` when a new entry was appended. Values that are not
    /// mappings or carry no `id` are skipped. `related` is the descriptor of
    /// the related type, if known; its declared relationships are kept out of
    /// the attributes.
    pub fn sideload(
        &mut self,
        document: &mut Document,
        resource_type: &str,
        data: &Value,
        related: Option<&ResourceDescriptor>,
    ) -> Result<bool> {
        self.track(document);

        let Some(fields) = data.as_object() else {
            trace!(resource_type, "skipping non-object relationship data");
            return Ok(false);
        };

        let id = fields.get(KEY_ID).unwrap_or(&Value::Null);
        let Some(key) = ResourceKey::new(resource_type, id) else {
            trace!(resource_type, "skipping relationship data without id");
            return Ok(false);
        };

        if self.seen.contains(&key) {
            return Ok(false);
        }

        if document.included.len() >= self.max_included {
            return Err(JapiError::LimitExceeded(format!(
                "document already includes {} resources (max: {})",
                document.included.len(),
                self.max_included
            )));
        }

        let attributes: SerializedNode = fields
            .iter()
            .filter(|(name, _)| !is_stripped(name, related))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        document.included.push(ResourceObject {
            resource_type: resource_type.to_string(),
            id: id.clone(),
            attributes,
            relationships: None,
            links: None,
        });
        trace!(resource_type, id = %key.id, "sideloaded related resource");
        self.seen.insert(key);
        self.tracked = document.included.len();

        Ok(true)
    }

    /// Record keys of `included` entries appended since the last call
    fn track(&mut self, document: &Document) {
        let added = document.included.iter().skip(self.tracked);
        self.seen.extend(added.filter_map(ResourceObject::key));
        self.tracked = document.included.len();
    }

    /// Number of distinct resources seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

fn is_stripped(name: &str, related: Option<&ResourceDescriptor>) -> bool {
    matches!(
        name,
        KEY_ID | KEY_TYPE | KEY_RELATIONSHIPS | KEY_LINKS | EXTRA_DATA_KEY
    ) || related.is_some_and(|descriptor| descriptor.has_relationship(name))
}
