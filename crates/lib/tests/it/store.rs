use std::collections::BTreeSet;

use zobject::{
    Error, Store,
    config::EditorContext,
    constants::NS_MAIN,
    factory::CreateOptions,
    model::{ModelError, Node, PathBuf, resolve},
};

use crate::helpers::*;

const ARGUMENTS: &str = "main.Z2K2.Z8K1";

fn empty_function_store() -> Store {
    let mut store = Store::new(EditorContext::default());
    store.load_canonical(
        NS_MAIN,
        &parse(
            r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z0"},"Z2K2":{"Z1K1":"Z8","Z8K1":["Z17"],
                "Z8K2":"","Z8K3":["Z20"],"Z8K4":["Z14"],"Z8K5":"Z0"}}"#,
        ),
    );
    store
}

fn marker(store: &Store) -> Node {
    store
        .read(ARGUMENTS)
        .and_then(Node::as_list)
        .map(|list| list.marker().clone())
        .expect("arguments list exists")
}

#[test]
fn test_missing_list_item_is_not_found() {
    let store = empty_function_store();
    let path = PathBuf::from("main.Z2K2.Z8K1.1.Z17K1");

    let err = resolve(store.document(), &path).unwrap_err();
    assert!(matches!(err, ModelError::PathNotFound { ref segment, .. } if segment == "1"));
    assert!(store.read(&path).is_none());
}

#[test]
fn test_append_then_delete_leaves_only_marker() {
    let mut store = empty_function_store();
    let before = store.read(ARGUMENTS).cloned();

    store
        .append_items(ARGUMENTS, [parse(r#"{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z0K1"}"#)])
        .unwrap();
    assert!(store.read("main.Z2K2.Z8K1.1.Z17K1").is_some());

    store.delete_items_at(ARGUMENTS, &[1]).unwrap();
    assert_eq!(store.read(ARGUMENTS).cloned(), before);
}

#[test]
fn test_marker_survives_every_list_edit() {
    let mut store = empty_function_store();
    let original = marker(&store);

    store
        .append_items(ARGUMENTS, ["a", "b", "c", "d"].map(Node::from))
        .unwrap();
    assert_eq!(marker(&store), original);
    store.move_item("main.Z2K2.Z8K1.4", -3).unwrap();
    assert_eq!(marker(&store), original);
    assert!(store.move_item("main.Z2K2.Z8K1.1", -1).is_err());
    assert_eq!(marker(&store), original);
    store.delete_items_at(ARGUMENTS, &[3, 1]).unwrap();
    assert_eq!(marker(&store), original);
    assert!(store.delete_items_at(ARGUMENTS, &[0]).is_err());
    store.delete_items_at(ARGUMENTS, &[1, 2]).unwrap();
    assert_eq!(marker(&store), original);

    let remaining = store.read(ARGUMENTS).and_then(Node::as_list).unwrap();
    assert!(remaining.is_empty());
    assert_eq!(remaining.marker(), &Node::reference("Z17"));
}

#[test]
fn test_local_keys_stay_contiguous() {
    let mut store = Store::new(EditorContext::default());
    store
        .create_root(NS_MAIN, "Z7", &CreateOptions::new().value("Z10100"))
        .unwrap();

    for value in ["a", "b", "c", "d", "e"] {
        store.add_local_argument(NS_MAIN, value).unwrap();
    }
    store.remove_local_argument(NS_MAIN, "K2").unwrap();
    store.remove_local_argument(NS_MAIN, "K4").unwrap();
    store.add_local_argument(NS_MAIN, "f").unwrap();
    store.remove_local_argument(NS_MAIN, "K1").unwrap();

    let keys = store.local_keys(NS_MAIN);
    let expected: Vec<String> = (1..=keys.len()).map(|i| format!("K{i}")).collect();
    assert_eq!(keys, expected);
    assert_eq!(store.read("main.K1"), Some(&Node::string("c")));
    assert_eq!(store.read("main.K3"), Some(&Node::string("f")));
}

#[test]
fn test_mutation_errors_surface_immediately() {
    let mut store = function_store();

    let err = store.append_items("main.Z2K2.Z8K2", [Node::from("x")]).unwrap_err();
    assert!(matches!(err, Error::Model(ModelError::NotAnArray { .. })));
    assert!(err.is_edit_error());

    let err = store.delete_items_at(ARGUMENTS, &[7]).unwrap_err();
    assert!(matches!(err, Error::Model(ModelError::InvalidIndex { index: 7, .. })));

    let err = store.add_local_argument("main.Z2K2.Z8K1", "x").unwrap_err();
    assert!(matches!(err, Error::Model(ModelError::ShapeMismatch { .. })));
}

#[test]
fn test_editing_a_label_in_place() {
    let mut store = function_store();
    let index = store.add_language("main.Z2K3", "Z1003").unwrap();
    assert_eq!(index, 1);
    store.write("main.Z2K3.Z12K1.1.Z11K2.Z6K1", "nom").unwrap();

    let canonical = store.canonical(NS_MAIN).unwrap();
    let label = canonical.as_object().and_then(|o| o.get("Z2K3")).unwrap();
    assert_eq!(
        serde_json::to_string(label).unwrap(),
        r#"{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1003","Z11K2":"nom"}]}"#
    );
}

#[test]
fn test_flags_follow_their_items() {
    let mut store = empty_function_store();
    store
        .append_items(ARGUMENTS, ["a", "b", "c", "d"].map(Node::from))
        .unwrap();
    store.mark_invalid_item(ARGUMENTS, 3).unwrap();

    store.delete_items_at(ARGUMENTS, &[1]).unwrap();
    assert_eq!(store.invalid_items().get(ARGUMENTS), Some(&BTreeSet::from([2])));
    assert_eq!(store.read("main.Z2K2.Z8K1.2"), Some(&Node::string("c")));

    store.move_item("main.Z2K2.Z8K1.2", 1).unwrap();
    assert_eq!(store.invalid_items().get(ARGUMENTS), Some(&BTreeSet::from([3])));
    store.move_item("main.Z2K2.Z8K1.1", 2).unwrap();
    assert_eq!(store.invalid_items().get(ARGUMENTS), Some(&BTreeSet::from([2])));
    assert_eq!(store.read("main.Z2K2.Z8K1.2"), Some(&Node::string("c")));

    store.delete_items_at(ARGUMENTS, &[2]).unwrap();
    assert!(store.invalid_items().is_empty());
}

#[test]
fn test_replacing_a_value_drops_its_flags() {
    let mut store = empty_function_store();
    store
        .append_items(ARGUMENTS, ["a", "b"].map(Node::from))
        .unwrap();

    store.mark_invalid_item(ARGUMENTS, 2).unwrap();
    store.write("main.Z2K2.Z8K1.2", "fixed").unwrap();
    assert!(store.invalid_items().is_empty());

    store.mark_invalid_item(ARGUMENTS, 1).unwrap();
    store.write(ARGUMENTS, parse(r#"["Z17"]"#)).unwrap();
    assert!(store.invalid_items().is_empty());

    store.append_items(ARGUMENTS, [Node::from("c")]).unwrap();
    store.mark_invalid_item(ARGUMENTS, 1).unwrap();
    store.unset("main.Z2K2").unwrap();
    assert!(store.invalid_items().is_empty());
}

#[test]
fn test_extreme_move_offsets_leave_the_list_alone() {
    let mut store = empty_function_store();
    store
        .append_items(ARGUMENTS, ["a", "b"].map(Node::from))
        .unwrap();
    let before = store.read(ARGUMENTS).cloned();

    let err = store.move_item("main.Z2K2.Z8K1.1", isize::MAX).unwrap_err();
    assert!(matches!(err, Error::Model(ModelError::InvalidIndex { .. })));
    assert!(store.move_item("main.Z2K2.Z8K1.2", isize::MIN).is_err());
    assert_eq!(store.read(ARGUMENTS).cloned(), before);
}
