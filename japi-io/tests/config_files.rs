//! Rendering driven by a configuration file on disk

use japi_format::{CollectionCheck, JapiError};
use japi_io::{render_json, AppConfig, RenderOptions};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
show_version_info = true
collection_check = "every-element"

[[resources]]
type_name = "Article"
resource_type = "articles"

[[resources.relationships]]
name = "author"
included_by_default = true
target = "people"

[[resources]]
type_name = "Person"
resource_type = "people"
"#;

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("japi.toml");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn loaded_configuration_drives_rendering() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load(&write_config(&dir, CONFIG)).unwrap();

    let registry = config.registry().unwrap();
    let options = RenderOptions::new(config.document_config().unwrap());
    assert_eq!(options.config.collection_check, CollectionCheck::EveryElement);

    let input = json!([{
        "$type": "Article",
        "id": "5",
        "title": "Hello",
        "author": {"$type": "Person", "id": "9", "name": "Dan"}
    }]);
    let value = render_json(&registry, &input, &options).unwrap();

    assert_eq!(
        serde_json::to_string(&value).unwrap(),
        serde_json::to_string(&json!({
            "jsonapi": {"version": "1.0"},
            "data": [{"type": "articles", "id": "5", "attributes": {"title": "Hello"}}],
            "included": [{"type": "people", "id": "9", "attributes": {"name": "Dan"}}]
        }))
        .unwrap()
    );
}

#[test]
fn every_element_check_rejects_mixed_collections() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load(&write_config(&dir, CONFIG)).unwrap();
    let registry = config.registry().unwrap();
    let options = RenderOptions::new(config.document_config().unwrap());

    let input = json!([{"$type": "Article", "id": "5", "title": "Hello"}, "stray"]);
    let value = render_json(&registry, &input, &options).unwrap();
    assert_eq!(value, json!([{"id": "5", "title": "Hello"}, "stray"]));
}

#[test]
fn unknown_target_fails_registry_build() {
    let dir = TempDir::new().unwrap();
    let text = CONFIG.replace("target = \"people\"", "target = \"humans\"");
    let config = AppConfig::load(&write_config(&dir, &text)).unwrap();

    assert!(matches!(
        config.registry(),
        Err(JapiError::UnknownRelationshipTarget { .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, JapiError::Io(_)));
}

#[test]
fn syntax_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "show_version_info = ");
    match AppConfig::load(&path) {
        Err(JapiError::InvalidConfig(reason)) => assert!(reason.contains("japi.toml")),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}
