//! End-to-end tests for YAML loading.

use metatree_yaml::{Error, Node, NodeData, NodeType, Position, Span, load};
use serde_json::json;

#[test]
fn test_empty_stream() {
    let yaml = load("").unwrap();
    assert_eq!(yaml.data_type, NodeType::Null);
    assert_eq!(yaml.span.start, Position::new(1, 0));
    assert_eq!(yaml.span.end, Position::new(1, 0));
}

#[test]
fn test_single_document_passthrough() {
    let yaml = load("test: 123").unwrap();

    assert_eq!(yaml.span.start.line, 1);
    assert_eq!(yaml.span.end.line, 1);
    assert_eq!(yaml.span.start.column, 0);
    assert_eq!(yaml.span.end.column, 9);

    let value = yaml.get("test").unwrap();
    assert_eq!(
        *value,
        Node::new(
            NodeData::Int(123),
            NodeType::Number,
            Span::new(Position::new(1, 6), Position::new(1, 9)),
        )
    );
}

#[test]
fn test_multi_document_array_span() {
    let yaml = load("---\na: 1\n---\nb: 2\n---\nc: 3\n").unwrap();

    assert_eq!(yaml.data_type, NodeType::Array);
    let docs = yaml.as_sequence().unwrap();
    assert_eq!(docs.len(), 3);

    assert_eq!(yaml.span.start, docs[0].span.start);
    assert_eq!(yaml.span.end, docs[2].span.end);
    assert_eq!(yaml.raw(), json!([{"a": 1}, {"b": 2}, {"c": 3}]));
}

#[test]
fn test_raw_view_of_nested_document() {
    let yaml = load(
        "project:\n  title: My Project\n  count: 2\n  authors:\n    - Alice\n    - Bob\n",
    )
    .unwrap();
    assert_eq!(
        yaml.raw(),
        json!({
            "project": {
                "title": "My Project",
                "count": 2,
                "authors": ["Alice", "Bob"],
            },
        })
    );
}

#[test]
fn test_entries_rebuild_raw_mapping() {
    let yaml = load("a: 1\nb:\n  - x\n  - y\nc:\n  d: true\n").unwrap();

    let mut rebuilt = serde_json::Map::new();
    for (key, value) in yaml.as_mapping().unwrap() {
        assert!(key.is_scalar());
        rebuilt.insert(key.key_text(), value.raw());
    }
    assert_eq!(serde_json::Value::Object(rebuilt), yaml.raw());
}

#[test]
fn test_non_string_keys() {
    let yaml = load("1: one\ntrue: yes\nnull: nothing\n").unwrap();

    let keys: Vec<&Node> = yaml.as_mapping().unwrap().keys().collect();
    assert_eq!(keys[0].data, NodeData::Int(1));
    assert_eq!(keys[1].data, NodeData::Bool(true));
    assert_eq!(keys[2].data, NodeData::Null);

    assert_eq!(
        yaml.raw(),
        json!({"1": "one", "true": "yes", "null": "nothing"})
    );
}

#[test]
fn test_explicit_core_tags() {
    let yaml = load("a: !!str 123\nb: !!int '42'\nc: !!float '1.5'\n").unwrap();
    assert_eq!(yaml.get("a").unwrap().as_str(), Some("123"));
    assert_eq!(yaml.get("a").unwrap().data_type, NodeType::String);
    assert_eq!(yaml.get("b").unwrap().as_i64(), Some(42));
    assert_eq!(yaml.get("c").unwrap().as_f64(), Some(1.5));
}

#[test]
fn test_explicit_tag_mismatch_is_construct_error() {
    let err = load("a: !!int notanumber").unwrap_err();
    assert!(matches!(err, Error::Construct { tag, .. } if tag == "int"));
}

#[test]
fn test_binary_tag() {
    let yaml = load("data: !!binary aGVsbG8=").unwrap();
    let value = yaml.get("data").unwrap();
    assert_eq!(value.data_type, NodeType::Binary);
    assert_eq!(value.data, NodeData::Binary(b"hello".to_vec()));
    assert_eq!(value.raw(), json!("aGVsbG8="));
}

#[test]
fn test_timestamp_tag() {
    let yaml = load("at: !!timestamp 2001-12-15T02:59:43.1Z").unwrap();
    let value = yaml.get("at").unwrap();
    assert_eq!(value.data_type, NodeType::Datetime);
    assert_eq!(value.raw(), json!("2001-12-15T02:59:43.1Z"));
}

#[test]
fn test_set_tag_yields_key_array() {
    let yaml = load("!!set\n? alpha\n? beta\n").unwrap();
    assert_eq!(yaml.data_type, NodeType::Array);
    assert_eq!(yaml.raw(), json!(["alpha", "beta"]));
}

#[test]
fn test_omap_tag_flattens_to_object() {
    let yaml = load("!!omap\n- first: 1\n- second: 2\n").unwrap();
    assert_eq!(yaml.data_type, NodeType::Object);
    assert_eq!(yaml.raw(), json!({"first": 1, "second": 2}));
    assert_eq!(yaml.get("second").unwrap().as_i64(), Some(2));
}

#[test]
fn test_pairs_tag_yields_pair_arrays() {
    let yaml = load("!!pairs\n- a: 1\n- a: 2\n").unwrap();
    assert_eq!(yaml.data_type, NodeType::Array);
    assert_eq!(yaml.raw(), json!([["a", 1], ["a", 2]]));
}

#[test]
fn test_flow_collections() {
    let yaml = load("{a: [1, 2], b: {c: 3}}").unwrap();
    assert_eq!(yaml.raw(), json!({"a": [1, 2], "b": {"c": 3}}));

    let a = yaml.get("a").unwrap();
    assert_eq!(a.span.start, Position::new(1, 4));
}

#[test]
fn test_parse_error_carries_engine_diagnostic() {
    let err = load("a:\n- b\n  c: d").unwrap_err();
    match err {
        Error::Parse { message } => assert!(!message.is_empty()),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_load_is_idempotent() {
    let text = "a: 1\nb:\n  - x\n  - {c: 2}\n";
    assert_eq!(load(text).unwrap(), load(text).unwrap());
}

#[test]
fn test_span_containment_holds_everywhere() {
    fn check(node: &Node) {
        let children: Vec<&Node> = match &node.data {
            NodeData::Array(items) => items.iter().collect(),
            NodeData::Object(map) => map.iter().flat_map(|(k, v)| [k, v]).collect(),
            _ => Vec::new(),
        };
        for child in children {
            assert!(
                node.span.contains(&child.span),
                "child {:?} escapes parent {:?}",
                child.span,
                node.span
            );
            check(child);
        }
    }

    for text in [
        "test: 123",
        "a:\n  b:\n    - 1\n    - c: [2, 3]\n",
        "{a: [1, {b: 2}], c: 'd'}",
        "---\na: 1\n---\n- b\n",
    ] {
        check(&load(text).unwrap());
    }
}
