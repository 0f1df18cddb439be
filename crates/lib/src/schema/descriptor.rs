//! Type descriptors.
//!
//! A field's declared type can be written three ways:
//!
//! - a literal identifier, `"Z6"` (or `{Z1K1: Z9, Z9K1: Z6}` once normalized)
//! - a generic-type expression, a function call to a generic constructor:
//!   `{Z1K1: Z7, Z7K1: Z881, Z881K1: Z6}`
//! - an inline type definition, a `Z4` object
//!
//! [`TypeDescriptor::parse`] accepts all three in either representation.

use std::fmt;

use crate::{
    constants::{
        Z_FUNCTION_CALL, Z_FUNCTION_CALL_FUNCTION, Z_REFERENCE, Z_TYPE, Z_TYPE_IDENTITY,
        Z_TYPED_LIST, Z_TYPED_MAP, Z_TYPED_PAIR,
    },
    convert::{to_canonical, to_normal},
    factory::FactoryError,
    model::{Node, ZObject, keys::is_reference_id},
};

/// The generic constructors with a container protocol of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericConstructor {
    List,
    Pair,
    Map,
}

impl GenericConstructor {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            Z_TYPED_LIST => Some(Self::List),
            Z_TYPED_PAIR => Some(Self::Pair),
            Z_TYPED_MAP => Some(Self::Map),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::List => Z_TYPED_LIST,
            Self::Pair => Z_TYPED_PAIR,
            Self::Map => Z_TYPED_MAP,
        }
    }
}

/// A parsed type descriptor. Composite forms are held normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A persisted type's id
    Literal(String),
    /// A call to a type-returning function, `Z7K1` names the function
    Generic { function: String, call: ZObject },
    /// An anonymous `Z4` definition
    Inline(ZObject),
}

impl TypeDescriptor {
    /// Parses a descriptor from a node in canonical or normalized form.
    pub fn parse(node: &Node) -> Result<Self, FactoryError> {
        match node {
            Node::Text(id) => Self::literal(node, id),
            Node::List(_) => Err(FactoryError::invalid(describe(node), "a list is not a type")),
            Node::Object(object) => match object.type_id() {
                Some(Z_REFERENCE) => {
                    let id = node.terminal_value().unwrap_or_default();
                    Self::literal(node, id)
                }
                Some(Z_FUNCTION_CALL) => {
                    let function = object
                        .get(Z_FUNCTION_CALL_FUNCTION)
                        .and_then(Node::terminal_value)
                        .filter(|id| is_reference_id(id))
                        .ok_or_else(|| {
                            FactoryError::invalid(describe(node), "type call names no function")
                        })?;
                    Ok(Self::Generic {
                        function: function.to_string(),
                        call: normalized(object),
                    })
                }
                Some(Z_TYPE) => Ok(Self::Inline(normalized(object))),
                _ => Err(FactoryError::invalid(
                    describe(node),
                    "expected an identifier, a type call or a type",
                )),
            },
        }
    }

    fn literal(node: &Node, id: &str) -> Result<Self, FactoryError> {
        if id.is_empty() {
            return Err(FactoryError::invalid(describe(node), "empty type identifier"));
        }
        if !is_reference_id(id) {
            return Err(FactoryError::invalid(describe(node), "not a type identifier"));
        }
        Ok(Self::Literal(id.to_string()))
    }

    /// The id used to select a builder.
    ///
    /// Literals dispatch on themselves, generic calls on their constructor
    /// function and inline definitions on `Z4`.
    pub fn dispatch_id(&self) -> &str {
        match self {
            Self::Literal(id) => id,
            Self::Generic { function, .. } => function,
            Self::Inline(_) => Z_TYPE,
        }
    }

    /// The literal id, if this is a literal descriptor.
    pub fn literal_id(&self) -> Option<&str> {
        match self {
            Self::Literal(id) => Some(id),
            _ => None,
        }
    }

    /// The generic constructor, if this is a typed list, pair or map.
    pub fn generic(&self) -> Option<GenericConstructor> {
        match self {
            Self::Generic { function, .. } => GenericConstructor::from_id(function),
            _ => None,
        }
    }

    /// A type parameter of a generic call, `Z881K1` for instance.
    pub fn parameter(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Generic { call, .. } => call.get(key),
            _ => None,
        }
    }

    /// The identity of an inline definition, when it names one.
    pub fn inline_identity(&self) -> Option<&str> {
        match self {
            Self::Inline(definition) => definition
                .get(Z_TYPE_IDENTITY)
                .and_then(Node::reference_id),
            _ => None,
        }
    }

    /// The descriptor as a normalized node, suitable as a `Z1K1` tag.
    pub fn to_node(&self) -> Node {
        match self {
            Self::Literal(id) => Node::reference(id.as_str()),
            Self::Generic { call, .. } => Node::Object(call.clone()),
            Self::Inline(definition) => Node::Object(definition.clone()),
        }
    }
}

/// Canonical JSON. Two descriptors for the same type render identically.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(id) => f.write_str(id),
            _ => f.write_str(&describe(&to_canonical(&self.to_node()))),
        }
    }
}

fn normalized(object: &ZObject) -> ZObject {
    match to_normal(&Node::Object(object.clone())) {
        Node::Object(object) => object,
        _ => object.clone(),
    }
}

/// Compact JSON of a node for messages and cache keys.
pub(crate) fn describe(node: &Node) -> String {
    serde_json::to_string(node).unwrap_or_else(|_| node.type_name().to_string())
}
