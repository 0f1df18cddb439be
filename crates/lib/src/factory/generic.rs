//! Typed lists, typed pairs and typed maps.
//!
//! Each constructor accepts both its literal id (`"Z882"`, parameters default
//! to `Z1`) and its call form (`{Z1K1: Z7, Z7K1: Z882, Z882K1: .., Z882K2: ..}`).

use super::{BuildContext, CreateOptions, FactoryError};
use crate::{
    constants::{
        K1, K2, Z_FUNCTION_CALL, Z_FUNCTION_CALL_FUNCTION, Z_OBJECT, Z_TYPED_LIST_TYPE,
        Z_TYPED_MAP, Z_TYPED_MAP_TYPE1, Z_TYPED_MAP_TYPE2, Z_TYPED_PAIR, Z_TYPED_PAIR_TYPE1,
        Z_TYPED_PAIR_TYPE2,
    },
    convert::to_normal,
    model::{Node, ZList, ZObject},
    schema::TypeDescriptor,
};

fn parameter(descriptor: &TypeDescriptor, key: &str) -> Node {
    descriptor
        .parameter(key)
        .cloned()
        .unwrap_or_else(|| Node::reference(Z_OBJECT))
}

/// The normalized call `{Z1K1: Z7, Z7K1: constructor, <constructor>K1: first, ...}`.
fn generic_call(constructor: &str, parameters: [(&str, Node); 2]) -> Node {
    let mut call = ZObject::new(Node::reference(Z_FUNCTION_CALL))
        .with(Z_FUNCTION_CALL_FUNCTION, Node::reference(constructor));
    for (key, value) in parameters {
        call.insert(key, value);
    }
    call.into()
}

/// The pair type with the given parameters.
pub(crate) fn pair_type(first: Node, second: Node) -> Node {
    generic_call(
        Z_TYPED_PAIR,
        [(Z_TYPED_PAIR_TYPE1, first), (Z_TYPED_PAIR_TYPE2, second)],
    )
}

/// An empty typed list. The marker is the list's item type, else the seed.
pub(super) fn build_typed_list(
    _cx: &mut BuildContext<'_, '_>,
    descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Result<Node, FactoryError> {
    let item_type = descriptor
        .parameter(Z_TYPED_LIST_TYPE)
        .cloned()
        .or_else(|| options.value.as_ref().map(to_normal))
        .unwrap_or_else(|| Node::reference(Z_OBJECT));
    Ok(ZList::new(item_type).into())
}

pub(super) fn build_typed_pair(
    cx: &mut BuildContext<'_, '_>,
    descriptor: &TypeDescriptor,
    options: &CreateOptions,
) -> Result<Node, FactoryError> {
    let first = parameter(descriptor, Z_TYPED_PAIR_TYPE1);
    let second = parameter(descriptor, Z_TYPED_PAIR_TYPE2);
    let tag = match descriptor {
        TypeDescriptor::Generic { .. } => descriptor.to_node(),
        _ => pair_type(first.clone(), second.clone()),
    };

    let (first, second) = if options.bare {
        (
            ZObject::new(first).into(),
            ZObject::new(second).into(),
        )
    } else {
        (
            cx.create(K1, &first, &CreateOptions::new())?,
            cx.create(K2, &second, &CreateOptions::new())?,
        )
    };
    Ok(ZObject::new(tag).with(K1, first).with(K2, second).into())
}

/// A typed map: a list of key/value pairs under `K1`, initially empty.
pub(super) fn build_typed_map(
    _cx: &mut BuildContext<'_, '_>,
    descriptor: &TypeDescriptor,
    _options: &CreateOptions,
) -> Result<Node, FactoryError> {
    let key_type = parameter(descriptor, Z_TYPED_MAP_TYPE1);
    let value_type = parameter(descriptor, Z_TYPED_MAP_TYPE2);
    let tag = match descriptor {
        TypeDescriptor::Generic { .. } => descriptor.to_node(),
        _ => generic_call(
            Z_TYPED_MAP,
            [
                (Z_TYPED_MAP_TYPE1, key_type.clone()),
                (Z_TYPED_MAP_TYPE2, value_type.clone()),
            ],
        ),
    };
    let entries = ZList::new(pair_type(key_type, value_type));
    Ok(ZObject::new(tag).with(K1, entries).into())
}
