//! Per-pass document assembly
//!
//! A [`DocumentBuilder`] owns the in-progress document of exactly one
//! serialization pass. Top-level typed objects with a descriptor are promoted
//! to resource objects; everything nested keeps the generic serialized shape
//! and is consumed by its parent. Declared relationships that are included by
//! default are sideloaded into `included` as objects are visited.

use crate::classifier::ResourceClassifier;
use crate::finalizer::DocumentFinalizer;
use crate::includer::RelationshipIncluder;
use crate::{DocumentVisitor, VisitContext};
use japi_format::constants::{EXTRA_DATA_KEY, KEY_DATA, KEY_LINKS, KEY_META, KEY_RELATIONSHIPS};
use japi_format::{
    Classification, Document, DocumentConfig, Node, ResourceDescriptor, ResourceObject,
    ResourceRegistry, Result, SerializedNode,
};
use serde_json::Value;
use tracing::{debug, trace};

/// State machine for one serialization pass
#[derive(Debug)]
pub struct DocumentBuilder<'r> {
    registry: &'r ResourceRegistry,
    config: DocumentConfig,
    includer: RelationshipIncluder,
    classification: Option<Classification>,
    document: Option<Document>,
    generic_root: Option<Value>,
    finalized: Option<Value>,
}

impl<'r> DocumentBuilder<'r> {
    /// Create a builder for a new pass
    pub fn new(registry: &'r ResourceRegistry, config: DocumentConfig) -> Self {
        let includer = RelationshipIncluder::new(config.limits.max_included);
        Self {
            registry,
            config,
            includer,
            classification: None,
            document: None,
            generic_root: None,
            finalized: None,
        }
    }

    /// Configuration of this pass
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Classification decided by [`DocumentVisitor::prepare`], if it ran
    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    /// In-progress document, if this is a document pass
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    fn classifier(&self) -> ResourceClassifier<'r> {
        ResourceClassifier::new(self.registry, self.config.collection_check)
    }

    /// Sideload every default-included relationship of `descriptor` found in `fields`
    fn sideload_relationships(
        &mut self,
        descriptor: &ResourceDescriptor,
        fields: &SerializedNode,
    ) -> Result<()> {
        let Some(document) = self.document.as_mut() else {
            return Ok(());
        };

        for relationship in descriptor.default_includes() {
            let Some(value) = fields.get(&relationship.name) else {
                continue;
            };

            let resource_type = descriptor.included_type(relationship);
            let related = relationship
                .target
                .as_deref()
                .and_then(|target| self.registry.lookup_resource_type(target));

            match value {
                Value::Array(items) => {
                    for item in items {
                        self.includer
                            .sideload(document, resource_type, item, related)?;
                    }
                }
                Value::Object(_) => {
                    self.includer
                        .sideload(document, resource_type, value, related)?;
                }
                _ => {
                    trace!(
                        relationship = relationship.name.as_str(),
                        "relationship value is neither a mapping nor a sequence"
                    );
                }
            }
        }

        Ok(())
    }

    /// Move the serialized envelope produced by traversal into the document
    fn absorb_root(document: &mut Document, root: Option<Value>) {
        let Some(Value::Object(mut root)) = root else {
            return;
        };

        if let Some(data) = root.get_mut(KEY_DATA) {
            document.data = data.take();
        }

        if let Some(Value::Object(retained)) = root.get(KEY_META) {
            let mut meta = retained.clone();
            for (key, value) in std::mem::take(&mut document.meta) {
                meta.insert(key, value);
            }
            document.meta = meta;
        }
    }
}

/// Promote serialized fields of a top-level object to a resource object
pub fn promote(descriptor: &ResourceDescriptor, fields: SerializedNode) -> ResourceObject {
    let id = fields
        .get(&descriptor.id_field)
        .cloned()
        .unwrap_or(Value::Null);
    let relationships = match fields.get(KEY_RELATIONSHIPS) {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    };
    let links = match fields.get(KEY_LINKS) {
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    };

    let attributes: SerializedNode = fields
        .into_iter()
        .filter(|(key, _)| !is_reserved_attribute(descriptor, key))
        .collect();

    ResourceObject {
        resource_type: descriptor.resource_type.clone(),
        id,
        attributes,
        relationships,
        links,
    }
}

fn is_reserved_attribute(descriptor: &ResourceDescriptor, key: &str) -> bool {
    key == descriptor.id_field
        || matches!(key, KEY_RELATIONSHIPS | KEY_LINKS | EXTRA_DATA_KEY)
        || descriptor.has_relationship(key)
}

impl DocumentVisitor for DocumentBuilder<'_> {
    fn prepare(&mut self, root: Node) -> Node {
        let classification = self.classifier().classify(&root);
        self.classification = Some(classification);

        if !classification.is_document() {
            debug!("root is not a JSON-API document, passing through");
            return root;
        }

        let (payload, meta) = match root {
            Node::Map(entries) if classification == Classification::Document => {
                let mut payload = Node::Null;
                let mut meta = None;
                for (key, value) in entries {
                    match key.as_str() {
                        KEY_DATA => payload = value,
                        KEY_META if matches!(value, Node::Map(_)) => meta = Some(value),
                        _ => {}
                    }
                }
                (payload, meta)
            }
            other => (other, None),
        };

        debug!(?classification, "starting JSON-API document pass");
        self.document = Some(Document::default());

        let mut envelope = vec![(KEY_DATA.to_string(), payload)];
        if let Some(meta) = meta {
            envelope.push((KEY_META.to_string(), meta));
        }
        Node::Map(envelope)
    }

    fn is_document(&self) -> bool {
        self.document.is_some()
    }

    fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    fn end_visiting_object(
        &mut self,
        type_name: &str,
        fields: SerializedNode,
        ctx: &VisitContext<'_>,
    ) -> Result<Value> {
        if !self.is_document() {
            return Ok(Value::Object(fields));
        }

        let registry = self.registry;
        let Some(descriptor) = registry.lookup(type_name) else {
            return Ok(Value::Object(fields));
        };

        let sideload = !ctx.sideload_disabled() && (ctx.depth == 0 || self.config.nested_sideload);
        if sideload {
            self.sideload_relationships(descriptor, &fields)?;
        }

        if ctx.depth > 0 {
            return Ok(Value::Object(fields));
        }

        let resource = promote(descriptor, fields);
        trace!(
            resource_type = resource.resource_type.as_str(),
            id = %resource.id,
            "promoted top-level object"
        );
        Ok(resource.into_value())
    }

    fn set_root(&mut self, root: Value) {
        self.generic_root = Some(root);
    }

    fn result(&mut self) -> Result<Value> {
        if let Some(finalized) = &self.finalized {
            return Ok(finalized.clone());
        }

        let generic = self.generic_root.take();
        let value = match self.document.take() {
            None => generic.unwrap_or(Value::Null),
            Some(mut document) => {
                Self::absorb_root(&mut document, generic.clone());
                // reached when enveloped `data` holds resources next to an `errors` key
                if document.is_error_shaped() {
                    debug!("error-shaped data, skipping JSON-API shaping");
                    generic.unwrap_or(Value::Null)
                } else {
                    DocumentFinalizer::new(self.config.show_version_info)
                        .finalize(document)
                        .to_value()?
                }
            }
        };

        self.finalized = Some(value.clone());
        Ok(value)
    }
}
