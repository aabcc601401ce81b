//! Final envelope assembly

use ahash::AHashSet;
use japi_format::{Document, JsonApiVersion, ResourceKey, Result};
use serde_json::Value;
use tracing::debug;

/// Assembles the final top-level envelope of a document pass
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFinalizer {
    show_version_info: bool,
}

impl DocumentFinalizer {
    /// Create a finalizer; `show_version_info` controls the `jsonapi` member
    pub fn new(show_version_info: bool) -> Self {
        Self { show_version_info }
    }

    /// Rebuild the envelope of an in-progress document
    ///
    /// Drops included resources that duplicate primary data or an earlier
    /// included entry. Finalizing a finalized document yields the same document.
    pub fn finalize(&self, document: Document) -> Document {
        let Document {
            meta,
            links,
            data,
            included,
            ..
        } = document;

        let mut seen: AHashSet<ResourceKey> = ResourceKey::all_in(&data).into_iter().collect();
        let before = included.len();
        let included: Vec<_> = included
            .into_iter()
            .filter(|entry| match entry.key() {
                Some(key) => seen.insert(key),
                None => true,
            })
            .collect();

        if included.len() != before {
            debug!(
                dropped = before - included.len(),
                "removed included resources duplicating primary data"
            );
        }

        Document {
            jsonapi: self.show_version_info.then(JsonApiVersion::default),
            meta,
            links,
            data,
            included,
        }
    }

    /// Finalize a rendered document value
    ///
    /// Error-shaped documents are returned unchanged.
    pub fn finalize_value(&self, value: Value) -> Result<Value> {
        let document = Document::from_value(value.clone())?;
        if document.is_error_shaped() {
            debug!("error-shaped document left untouched");
            return Ok(value);
        }
        self.finalize(document).to_value()
    }
}
