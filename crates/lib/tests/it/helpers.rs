use zobject::{
    Store,
    config::EditorContext,
    constants::NS_MAIN,
    convert::to_canonical,
    factory::CreateOptions,
    model::Node,
};

/// Parses a JSON document into a node.
pub fn parse(json: &str) -> Node {
    serde_json::from_str(json).expect("test JSON must parse")
}

/// Serializes the canonical form of `node` as compact JSON.
pub fn canonical_json(node: &Node) -> String {
    serde_json::to_string(&to_canonical(node)).expect("nodes always serialize")
}

/// A store editing a fresh persistent function in `main`.
pub fn function_store() -> Store {
    let mut store = Store::new(EditorContext::default());
    store
        .create_root(NS_MAIN, "Z2", &CreateOptions::new().value("Z8").root())
        .expect("Z2 always scaffolds");
    store
}

/// A persistent type whose second key refers back to the type itself.
pub fn tree_type(id: &str) -> Node {
    parse(&format!(
        r#"{{"Z1K1":"Z2","Z2K1":"{id}","Z2K2":{{"Z1K1":"Z4","Z4K1":"{id}","Z4K2":["Z3",
            {{"Z1K1":"Z3","Z3K1":"Z6","Z3K2":"{id}K1"}},
            {{"Z1K1":"Z3","Z3K1":"{id}","Z3K2":"{id}K2"}}]}}}}"#
    ))
}

/// Sample canonical documents covering every node shape.
pub fn canonical_samples() -> Vec<Node> {
    [
        r#""hello""#,
        r#""Z41""#,
        r#"{"Z1K1":"Z6","Z6K1":"Z11"}"#,
        r#"{"Z1K1":"Z40","Z40K1":"Z41"}"#,
        r#"["Z6","a",{"Z1K1":"Z6","Z6K1":"Z1002"},"b"]"#,
        r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z10001"},"Z2K2":{"Z1K1":"Z8",
            "Z8K1":["Z17",{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z10001K1",
            "Z17K3":{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"input"}]}}],
            "Z8K2":"Z40","Z8K3":["Z20"],"Z8K4":["Z14","Z10002"],"Z8K5":"Z10001"},
            "Z2K3":{"Z1K1":"Z12","Z12K1":["Z11"]},"Z2K4":{"Z1K1":"Z32","Z32K1":["Z31"]},
            "Z2K5":{"Z1K1":"Z12","Z12K1":["Z11"]}}"#,
        r#"{"Z1K1":{"Z1K1":"Z7","Z7K1":"Z881","Z881K1":"Z6"},"K1":"x","K2":["Z1"]}"#,
    ]
    .into_iter()
    .map(parse)
    .collect()
}
