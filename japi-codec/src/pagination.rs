//! Pagination envelope augmentation
//!
//! Only the `first` link is produced. `last`, `next` and `previous` are not
//! emitted.

use crate::DocumentVisitor;
use japi_format::constants::{LINK_FIRST, META_LIMIT, META_OFFSET, META_TOTAL_RESULTS};
use japi_format::{Document, Node, OffsetPaginated, Result};
use serde_json::Value;
use tracing::debug;

/// Serializes paginated representations and records their envelope members
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationEnvelopeBuilder;

impl PaginationEnvelopeBuilder {
    /// Serialize a paginated representation
    ///
    /// `generic` serializes the items the way the surrounding serializer
    /// serializes any sequence. In a document pass the pagination `meta` and
    /// `links` members are written into the in-progress document; otherwise
    /// only the items are returned.
    pub fn serialize<V, F>(
        visitor: &mut V,
        representation: &OffsetPaginated,
        generic: F,
    ) -> Result<Value>
    where
        V: DocumentVisitor + ?Sized,
        F: FnOnce(&mut V, &[Node]) -> Result<Value>,
    {
        if !visitor.is_document() {
            return generic(visitor, &representation.items);
        }

        let data = generic(visitor, &representation.items)?;

        if let Some(document) = visitor.document_mut() {
            Self::augment(document, representation);
        }

        Ok(data)
    }

    /// Write pagination `meta` and `links` members into a document
    pub fn augment(document: &mut Document, representation: &OffsetPaginated) {
        document
            .meta
            .insert(META_OFFSET.to_string(), Value::from(representation.offset));
        document
            .meta
            .insert(META_LIMIT.to_string(), Value::from(representation.limit));
        document.meta.insert(
            META_TOTAL_RESULTS.to_string(),
            Value::from(representation.total_results),
        );
        document.links.insert(
            LINK_FIRST.to_string(),
            Value::String(representation.uri_for_page(1)),
        );
        debug!(
            offset = representation.offset,
            limit = representation.limit,
            total_results = representation.total_results,
            "recorded pagination envelope"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> OffsetPaginated {
        OffsetPaginated {
            items: Vec::new(),
            offset: 0,
            limit: 10,
            total_results: 42,
            route: "/articles?page[offset]={offset}&page[limit]={limit}".to_string(),
        }
    }

    #[test]
    fn augment_writes_meta_and_first_link() {
        let mut document = Document::default();
        PaginationEnvelopeBuilder::augment(&mut document, &page());

        assert_eq!(
            Value::Object(document.meta),
            json!({"offset": 0, "limit": 10, "total-results": 42})
        );
        assert_eq!(
            Value::Object(document.links),
            json!({"first": "/articles?page[offset]=0&page[limit]=10"})
        );
    }

    #[test]
    fn augment_keeps_existing_meta() {
        let mut document = Document::default();
        document.meta.insert("generated".to_string(), json!(true));
        PaginationEnvelopeBuilder::augment(&mut document, &page());

        let keys: Vec<&str> = document.meta.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["generated", "offset", "limit", "total-results"]);
    }
}
