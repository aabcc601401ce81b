//! Document assembly driven through the visitor callbacks by hand, the way a
//! serializer walks a graph: post-order, nested objects before their parents.

use japi_codec::{
    DocumentBuilder, DocumentConfig, DocumentVisitor, Node, PaginationEnvelopeBuilder,
    VisitContext,
};
use japi_test_utils::{article, blog_registry, fields, page, person};
use serde_json::{json, Value};

const NO_GROUPS: &[String] = &[];

fn top() -> VisitContext<'static> {
    VisitContext::top_level(NO_GROUPS)
}

fn nested() -> VisitContext<'static> {
    VisitContext {
        depth: 1,
        groups: NO_GROUPS,
    }
}

/// Visit an article with a nested author the way a navigator would
fn visit_article(builder: &mut DocumentBuilder<'_>, id: &str, author_id: &str) -> Value {
    let author = builder
        .end_visiting_object(
            "Person",
            fields(json!({"id": author_id, "name": format!("Person {author_id}")})),
            &nested(),
        )
        .unwrap();
    builder
        .end_visiting_object(
            "Article",
            fields(json!({"id": id, "title": format!("Article {id}"), "author": author})),
            &top(),
        )
        .unwrap()
}

#[test]
fn single_resource_document() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());

    let prepared = builder.prepare(article("5", "Hello", person("9", "Dan")));
    assert!(prepared.get("data").is_some());

    let data = visit_article(&mut builder, "5", "9");
    builder.set_root(json!({"data": data}));

    assert_eq!(
        builder.result().unwrap(),
        json!({
            "data": {"type": "articles", "id": "5", "attributes": {"title": "Article 5"}},
            "included": [
                {"type": "people", "id": "9", "attributes": {"name": "Person 9"}}
            ]
        })
    );
}

#[test]
fn shared_author_is_included_once() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());

    builder.prepare(Node::Sequence(vec![
        article("1", "One", person("9", "Dan")),
        article("2", "Two", person("9", "Dan")),
    ]));

    let first = visit_article(&mut builder, "1", "9");
    let second = visit_article(&mut builder, "2", "9");
    builder.set_root(json!({"data": [first, second]}));

    let result = builder.result().unwrap();
    let included = result["included"].as_array().unwrap();
    assert_eq!(included.len(), 1);
    assert_eq!(included[0]["id"], json!("9"));
    assert_eq!(result["data"].as_array().unwrap().len(), 2);
}

#[test]
fn included_never_duplicates_primary_data() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());

    builder.prepare(Node::Sequence(vec![person("9", "Dan")]));

    // A person whose employer is itself listed as a primary resource elsewhere
    let employer = builder
        .end_visiting_object("Company", fields(json!({"id": "acme"})), &nested())
        .unwrap();
    let dan = builder
        .end_visiting_object(
            "Person",
            fields(json!({"id": "9", "name": "Dan", "employer": employer})),
            &top(),
        )
        .unwrap();
    let acme = builder
        .end_visiting_object(
            "Company",
            fields(json!({"id": "acme", "name": "ACME"})),
            &top(),
        )
        .unwrap();
    builder.set_root(json!({"data": [dan, acme]}));

    let result = builder.result().unwrap();
    assert!(result.get("included").is_none());
    assert_eq!(result["data"][0]["attributes"], json!({"name": "Dan"}));
}

#[test]
fn nested_objects_sideload_their_own_relationships() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());
    builder.prepare(Node::Sequence(Vec::new()));

    let employer = builder
        .end_visiting_object(
            "Company",
            fields(json!({"id": "acme", "name": "ACME"})),
            &VisitContext {
                depth: 2,
                groups: NO_GROUPS,
            },
        )
        .unwrap();
    let author = builder
        .end_visiting_object(
            "Person",
            fields(json!({"id": "9", "name": "Dan", "employer": employer})),
            &nested(),
        )
        .unwrap();
    let data = builder
        .end_visiting_object(
            "Article",
            fields(json!({"id": "1", "title": "One", "author": author})),
            &top(),
        )
        .unwrap();
    builder.set_root(json!({"data": [data]}));

    let result = builder.result().unwrap();
    let types: Vec<&str> = result["included"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["companies", "people"]);
    // the employer relationship of the included person is not an attribute
    assert_eq!(result["included"][1]["attributes"], json!({"name": "Dan"}));
}

#[test]
fn nested_sideload_can_be_disabled() {
    let registry = blog_registry();
    let config = DocumentConfig::default().with_nested_sideload(false);
    let mut builder = DocumentBuilder::new(&registry, config);
    builder.prepare(Node::Sequence(Vec::new()));

    let employer = builder
        .end_visiting_object("Company", fields(json!({"id": "acme"})), &nested())
        .unwrap();
    let author = builder
        .end_visiting_object(
            "Person",
            fields(json!({"id": "9", "employer": employer})),
            &nested(),
        )
        .unwrap();
    let data = builder
        .end_visiting_object(
            "Article",
            fields(json!({"id": "1", "author": author})),
            &top(),
        )
        .unwrap();
    builder.set_root(json!({"data": [data]}));

    let result = builder.result().unwrap();
    let included = result["included"].as_array().unwrap();
    assert_eq!(included.len(), 1);
    assert_eq!(included[0]["type"], json!("people"));
}

#[test]
fn sequence_relationships_sideload_every_element() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());
    builder.prepare(Node::Sequence(Vec::new()));

    let data = builder
        .end_visiting_object(
            "Article",
            fields(json!({
                "id": "1",
                "tags": [{"slug": "rust", "id": "t1"}, {"id": "t2"}, {"label": "no id"}]
            })),
            &top(),
        )
        .unwrap();
    builder.set_root(json!({"data": [data]}));

    let result = builder.result().unwrap();
    let ids: Vec<&Value> = result["included"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| &entry["id"])
        .collect();
    assert_eq!(ids, vec![&json!("t1"), &json!("t2")]);
}

#[test]
fn pagination_envelope_is_recorded() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(
        &registry,
        DocumentConfig::default().with_version_info(true),
    );

    let root = page(vec![article("1", "One", person("9", "Dan"))], 0, 10, 42);
    let prepared = builder.prepare(root);

    let Some(Node::Paginated(representation)) = prepared.get("data") else {
        panic!("expected paginated payload");
    };
    let data = PaginationEnvelopeBuilder::serialize(&mut builder, representation, |visitor, items| {
        assert_eq!(items.len(), 1);
        let author = visitor.end_visiting_object(
            "Person",
            fields(json!({"id": "9", "name": "Dan"})),
            &nested(),
        )?;
        let article = visitor.end_visiting_object(
            "Article",
            fields(json!({"id": "1", "title": "One", "author": author})),
            &top(),
        )?;
        Ok(Value::Array(vec![article]))
    })
    .unwrap();
    builder.set_root(json!({"data": data}));

    let result = builder.result().unwrap();
    assert_eq!(
        serde_json::to_string(&result).unwrap(),
        serde_json::to_string(&json!({
            "jsonapi": {"version": "1.0"},
            "meta": {"offset": 0, "limit": 10, "total-results": 42},
            "links": {"first": "/articles?page[offset]=0&page[limit]=10"},
            "data": [{"type": "articles", "id": "1", "attributes": {"title": "One"}}],
            "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
        }))
        .unwrap()
    );
}

#[test]
fn retained_meta_precedes_pagination_meta() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());

    let root = Node::map([
        ("data", page(Vec::new(), 0, 10, 0)),
        ("meta", Node::map([("generated", Node::from(true))])),
    ]);
    let prepared = builder.prepare(root);
    let Some(Node::Paginated(representation)) = prepared.get("data") else {
        panic!("expected paginated payload");
    };
    let data = PaginationEnvelopeBuilder::serialize(&mut builder, representation, |_, _| {
        Ok(json!([]))
    })
    .unwrap();
    builder.set_root(json!({"data": data, "meta": {"generated": true}}));

    let result = builder.result().unwrap();
    let keys: Vec<&str> = result["meta"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["generated", "offset", "limit", "total-results"]);
}

#[test]
fn pagination_outside_document_returns_items_only() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());

    let root = Node::map([("results", page(vec![Node::from("plain")], 0, 10, 1))]);
    let prepared = builder.prepare(root);
    assert!(!builder.is_document());

    let Some(Node::Paginated(representation)) = prepared.get("results") else {
        panic!("expected untouched paginated value");
    };
    let data = PaginationEnvelopeBuilder::serialize(&mut builder, representation, |_, items| {
        assert_eq!(items.len(), 1);
        Ok(json!(["plain"]))
    })
    .unwrap();

    assert_eq!(data, json!(["plain"]));
    assert!(builder.document_mut().is_none());
}

#[test]
fn empty_collection_renders_bare_data() {
    let registry = blog_registry();
    let mut builder = DocumentBuilder::new(&registry, DocumentConfig::default());
    builder.prepare(Node::Sequence(Vec::new()));
    builder.set_root(json!({"data": []}));
    assert_eq!(builder.result().unwrap(), json!({"data": []}));
}
