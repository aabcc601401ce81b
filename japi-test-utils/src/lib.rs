//! JAPI Test Utilities
//!
//! Shared fixtures and builders for tests across the JAPI workspace.

use japi_format::{
    Node, ObjectNode, OffsetPaginated, RelationshipDescriptor, ResourceDescriptor,
    ResourceRegistry, SerializedNode,
};
use serde_json::Value;

/// Registry for a small blog domain
///
/// - `Article` → `articles`, sideloads `author` (`people`) and `tags` (`tags`)
///   by default; `comments` must be requested explicitly
/// - `Person` → `people`, declares `employer` (`companies`)
/// - `Company` → `companies`
/// - `Tag` → `tags`, identified by `slug`
pub fn blog_registry() -> ResourceRegistry {
    ResourceRegistry::builder()
        .register(
            "Article",
            ResourceDescriptor::new("articles")
                .with_relationship(
                    RelationshipDescriptor::new("author")
                        .included_by_default()
                        .with_target("people"),
                )
                .with_relationship(
                    RelationshipDescriptor::new("tags")
                        .included_by_default()
                        .with_target("tags"),
                )
                .with_relationship(RelationshipDescriptor::new("comments")),
        )
        .register(
            "Person",
            ResourceDescriptor::new("people").with_relationship(
                RelationshipDescriptor::new("employer")
                    .included_by_default()
                    .with_target("companies"),
            ),
        )
        .register("Company", ResourceDescriptor::new("companies"))
        .register("Tag", ResourceDescriptor::new("tags").with_id_field("slug"))
        .build()
        .expect("blog registry is valid")
}

/// Builder for typed graph objects
pub struct ObjectBuilder {
    object: ObjectNode,
}

impl ObjectBuilder {
    /// Start a typed object
    pub fn new(type_name: &str) -> Self {
        Self {
            object: ObjectNode::new(type_name),
        }
    }

    /// Add a string field
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.object = self.object.field(key, value);
        self
    }

    /// Add an integer field
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.object = self.object.field(key, value);
        self
    }

    /// Add a field holding any node
    pub fn node(mut self, key: &str, value: Node) -> Self {
        self.object = self.object.field(key, value);
        self
    }

    /// Build the node
    pub fn build(self) -> Node {
        Node::Object(self.object)
    }
}

/// A person with an id and a name
pub fn person(id: &str, name: &str) -> Node {
    ObjectBuilder::new("Person")
        .string("id", id)
        .string("name", name)
        .build()
}

/// An article with an id, a title and an author
pub fn article(id: &str, title: &str, author: Node) -> Node {
    ObjectBuilder::new("Article")
        .string("id", id)
        .string("title", title)
        .node("author", author)
        .build()
}

/// A page of items with a conventional offset/limit route
pub fn page(items: Vec<Node>, offset: u64, limit: u64, total_results: u64) -> Node {
    Node::from(OffsetPaginated {
        items,
        offset,
        limit,
        total_results,
        route: "/articles?page[offset]={offset}&page[limit]={limit}".to_string(),
    })
}

/// Unwrap a JSON object literal into serialized fields
pub fn fields(value: Value) -> SerializedNode {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
