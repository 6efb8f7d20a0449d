//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rime::Container;
use serde_json::{Value as JsonValue, json};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn object() -> JsonValue {
    json!({"foo": "bar"})
}

pub fn deeply_nested_object() -> JsonValue {
    json!({"some": {"deeply": {"nested": "object"}}})
}

pub fn array() -> JsonValue {
    json!(["foo", "bar"])
}

pub fn container(plain: JsonValue) -> Container {
    Container::wrap(plain).expect("fixture is record-like or sequence-like")
}

/// A wide, fairly deep document for sharing tests.
pub fn catalog(width: usize) -> JsonValue {
    let sections: serde_json::Map<String, JsonValue> = (0..width)
        .map(|i| {
            let items: Vec<JsonValue> = (0..width)
                .map(|j| json!({"id": j, "title": format!("item {}-{}", i, j), "tags": ["a", "b"]}))
                .collect();
            (format!("section{}", i), json!({"items": items}))
        })
        .collect();
    json!({"catalog": sections})
}
