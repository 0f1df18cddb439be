//! Conversion between the canonical and normalized representations.
//!
//! The **canonical** form is the terse wire shape: references are bare ids
//! (`"Z11"`), strings are bare text (`"hello"`), every composite carries a
//! `Z1K1` tag and typed lists are arrays whose first element is the type.
//!
//! The **normalized** form materializes every terminal as a tagged composite
//! so that an editor can address any field by key path:
//!
//! | canonical                        | normalized                                     |
//! |----------------------------------|------------------------------------------------|
//! | `"hello"`                        | `{"Z1K1":"Z6","Z6K1":"hello"}`                 |
//! | `"Z11"`                          | `{"Z1K1":"Z9","Z9K1":"Z11"}`                   |
//! | `{"Z1K1":"Z6","Z6K1":"Z11"}`     | `{"Z1K1":"Z6","Z6K1":"Z11"}`                   |
//! | `{"Z1K1":"Z40","Z40K1":"Z41"}`   | `{"Z1K1":{"Z1K1":"Z9","Z9K1":"Z40"},"Z40K1":{..}}` |
//!
//! A string whose content looks like a reference id keeps its explicit `Z6`
//! wrapper in canonical form, otherwise it would be read back as a reference.
//!
//! For every canonical `x`: `to_canonical(&to_normal(&x)) == x`.

use crate::{
    constants::{Z_OBJECT_TYPE, Z_REFERENCE, Z_REFERENCE_ID, Z_STRING, Z_STRING_VALUE},
    model::{Node, ZList, ZObject, keys::is_reference_id},
};

/// Converts any node into its normalized form. Idempotent.
pub fn to_normal(node: &Node) -> Node {
    match node {
        Node::Text(text) if is_reference_id(text) => Node::reference(text.as_str()),
        Node::Text(text) => Node::string(text.as_str()),
        Node::List(list) => Node::List(map_list(list, to_normal)),
        Node::Object(object) => Node::Object(normalize_object(object)),
    }
}

fn normalize_object(object: &ZObject) -> ZObject {
    let raw_tag = matches!(
        object.type_node(),
        Some(Node::Text(tag)) if tag == Z_STRING || tag == Z_REFERENCE
    );

    object
        .iter()
        .map(|(key, value)| {
            let terminal = matches!(value, Node::Text(_))
                && (key == Z_STRING_VALUE
                    || key == Z_REFERENCE_ID
                    || (key == Z_OBJECT_TYPE && raw_tag));
            let value = if terminal {
                value.clone()
            } else {
                to_normal(value)
            };
            (key.to_string(), value)
        })
        .collect()
}

/// Converts any node into its canonical form. Idempotent.
pub fn to_canonical(node: &Node) -> Node {
    match node {
        Node::Text(_) => node.clone(),
        Node::List(list) => Node::List(map_list(list, to_canonical)),
        Node::Object(object) => collapse_terminal(object)
            .unwrap_or_else(|| Node::Object(canonicalize_object(object))),
    }
}

/// Collapses a plain string or reference composite into bare text.
fn collapse_terminal(object: &ZObject) -> Option<Node> {
    if object.len() != 2 {
        return None;
    }
    match object.type_id()? {
        Z_REFERENCE => {
            let id = object.get(Z_REFERENCE_ID)?.as_text()?;
            Some(Node::text(id))
        }
        Z_STRING => {
            let text = object.get(Z_STRING_VALUE)?.as_text()?;
            if is_reference_id(text) {
                Some(Node::Object(
                    ZObject::with_raw_type(Z_STRING).with(Z_STRING_VALUE, Node::text(text)),
                ))
            } else {
                Some(Node::text(text))
            }
        }
        _ => None,
    }
}

fn canonicalize_object(object: &ZObject) -> ZObject {
    object
        .iter()
        .map(|(key, value)| (key.to_string(), to_canonical(value)))
        .collect()
}

fn map_list(list: &ZList, convert: fn(&Node) -> Node) -> ZList {
    ZList::from_items(
        convert(list.marker()),
        list.items().map(|(_, item)| convert(item)),
    )
}
