use zobject::{
    convert::{to_canonical, to_normal},
    model::Node,
};

use crate::helpers::*;

#[test]
fn test_round_trip_for_canonical_documents() {
    for canonical in canonical_samples() {
        let normal = to_normal(&canonical);
        assert_eq!(to_canonical(&normal), canonical, "round trip of {canonical:?}");
        assert_eq!(to_normal(&normal), normal);
    }
}

#[test]
fn test_normalized_terminals_are_tagged() {
    let normal = to_normal(&parse(r#"["Z6","a","Z41"]"#));
    assert_eq!(
        serde_json::to_string(&normal).unwrap(),
        concat!(
            r#"[{"Z1K1":"Z9","Z9K1":"Z6"},{"Z1K1":"Z6","Z6K1":"a"},"#,
            r#"{"Z1K1":"Z9","Z9K1":"Z41"}]"#
        )
    );
}

#[test]
fn test_reference_looking_string_keeps_wrapper() {
    let string = Node::string("Z11");
    assert_eq!(
        serde_json::to_string(&to_canonical(&string)).unwrap(),
        r#"{"Z1K1":"Z6","Z6K1":"Z11"}"#
    );
    assert_eq!(to_canonical(&Node::reference("Z11")), Node::from("Z11"));
}
