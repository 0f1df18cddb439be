use zobject::{
    config::EditorContext,
    factory::{BuilderRegistry, CreateOptions, Factory},
    model::Node,
    schema::SchemaCache,
};

use crate::helpers::*;

fn create(schemas: &SchemaCache, descriptor: impl Into<Node>, options: &CreateOptions) -> Node {
    let context = EditorContext::default();
    let registry = BuilderRegistry::with_builtins();
    Factory::new(&context, schemas, &registry)
        .create(descriptor, options)
        .unwrap()
}

#[test]
fn test_string_seeded_with_value() {
    let node = create(&SchemaCache::new(), "Z6", &CreateOptions::new().value("hello"));
    assert_eq!(canonical_json(&node), r#""hello""#);
}

#[test]
fn test_boolean_seeded_with_true() {
    let node = create(&SchemaCache::new(), "Z40", &CreateOptions::new().value("Z41"));
    assert_eq!(canonical_json(&node), r#"{"Z1K1":"Z40","Z40K1":"Z41"}"#);
}

#[test]
fn test_recursive_type_terminates_with_stub() {
    let mut schemas = SchemaCache::new();
    schemas.insert_persisted(&tree_type("Z10001"));

    let node = create(&schemas, "Z10001", &CreateOptions::new());
    assert!(node.depth() <= 4);
    assert_eq!(
        node.as_object().and_then(|o| o.get("Z10001K2")),
        Some(&Node::reference(""))
    );
}

#[test]
fn test_generic_list_of_recursive_type() {
    let mut schemas = SchemaCache::new();
    schemas.insert_persisted(&tree_type("Z10001"));

    let descriptor = parse(r#"{"Z1K1":"Z7","Z7K1":"Z881","Z881K1":"Z10001"}"#);
    let node = create(&schemas, descriptor, &CreateOptions::new());
    assert_eq!(canonical_json(&node), r#"["Z10001"]"#);
}

#[test]
fn test_unknown_types_never_fail() {
    let node = create(&SchemaCache::new(), "Z99999", &CreateOptions::new());
    assert_eq!(canonical_json(&node), r#"{"Z1K1":"Z99999"}"#);
}
