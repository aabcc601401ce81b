//! Independent rendering passes sharing one registry across threads

use japi_format::ResourceRegistry;
use japi_io::{render, RenderOptions};
use japi_test_utils::{article, blog_registry, person};
use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;

fn render_batch(registry: &ResourceRegistry, worker: usize) -> Value {
    let root = (0..20)
        .map(|i| {
            article(
                &format!("{worker}-{i}"),
                "Title",
                person(&format!("{}", i % 3), "Author"),
            )
        })
        .collect::<Vec<_>>();
    render(registry, root.into(), &RenderOptions::default()).unwrap()
}

#[test]
fn registry_is_shared_between_threads() {
    let registry = Arc::new(blog_registry());

    let results: Vec<Value> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || render_batch(&registry, worker))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (worker, value) in results.iter().enumerate() {
        let data = value["data"].as_array().unwrap();
        assert_eq!(data.len(), 20);
        assert_eq!(data[0]["id"], json!(format!("{worker}-0")));

        let included = value["included"].as_array().unwrap();
        let ids: Vec<&Value> = included.iter().map(|entry| &entry["id"]).collect();
        assert_eq!(ids, vec![&json!("0"), &json!("1"), &json!("2")]);
    }
}

#[test]
fn passes_do_not_leak_state() {
    let registry = blog_registry();
    let first = render_batch(&registry, 0);
    let second = render_batch(&registry, 0);
    assert_eq!(first, second);
}
