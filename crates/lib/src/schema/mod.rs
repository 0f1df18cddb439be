//! Type descriptors and the schema cache.
//!
//! The [`SchemaCache`] remembers what has been learned about persisted
//! objects: the declared keys of types, the argument lists of functions and
//! the display labels of anything. It is filled from fetched objects with
//! [`SchemaCache::insert_persisted`] and read by the factory and the store.
//! The cache never performs lookups itself; an id that is not cached is
//! simply unknown.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    constants::{
        Z_ARGUMENT_KEY, Z_ARGUMENT_TYPE, Z_BOOLEAN, Z_BOOLEAN_IDENTITY, Z_BOOLEAN_TRUE,
        Z_FUNCTION, Z_FUNCTION_ARGUMENTS, Z_FUNCTION_RETURN_TYPE, Z_KEY_ID, Z_KEY_IS_IDENTITY,
        Z_KEY_TYPE, Z_LANG_EN, Z_MONOLINGUAL_STRING_LANGUAGE, Z_MONOLINGUAL_STRING_VALUE,
        Z_MULTILINGUAL_STRING_VALUE, Z_PERSISTENT_OBJECT, Z_PERSISTENT_OBJECT_ID,
        Z_PERSISTENT_OBJECT_LABEL, Z_PERSISTENT_OBJECT_VALUE, Z_TYPE, Z_TYPE_KEYS,
    },
    convert::to_normal,
    model::{Node, ZObject},
};

pub mod descriptor;

pub use descriptor::{GenericConstructor, TypeDescriptor};

/// One declared key of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    /// Full key, `Z10001K1`
    pub key: String,
    /// Declared value type, normalized
    pub value_type: Node,
    /// The key holds the identity of instances of this type
    pub is_identity: bool,
}

/// The declared keys of a type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSchema {
    pub id: String,
    pub keys: Vec<KeySchema>,
}

impl TypeSchema {
    /// Reads the keys of a `Z4` definition in either form.
    pub fn from_definition(id: impl Into<String>, definition: &ZObject) -> Self {
        let keys = definition
            .get(Z_TYPE_KEYS)
            .and_then(Node::as_list)
            .map(|list| {
                list.items()
                    .filter_map(|(_, item)| item.as_object())
                    .filter_map(|key| {
                        let id = key.get(Z_KEY_ID).and_then(Node::terminal_value)?;
                        let value_type = key.get(Z_KEY_TYPE).map(to_normal)?;
                        Some(KeySchema {
                            key: id.to_string(),
                            value_type,
                            is_identity: key.get(Z_KEY_IS_IDENTITY).is_some_and(is_true),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: id.into(),
            keys,
        }
    }

    /// The key that holds instance identity, if any.
    pub fn identity_key(&self) -> Option<&KeySchema> {
        self.keys.iter().find(|key| key.is_identity)
    }
}

/// One declared argument of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSchema {
    /// Full key, `Z801K1`
    pub key: String,
    /// Declared argument type, normalized
    pub value_type: Node,
}

/// The argument list and output type of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub id: String,
    pub arguments: Vec<ArgumentSchema>,
    pub output: Option<Node>,
}

impl FunctionSignature {
    /// Reads a `Z8` definition in either form.
    pub fn from_definition(id: impl Into<String>, definition: &ZObject) -> Self {
        let arguments = definition
            .get(Z_FUNCTION_ARGUMENTS)
            .and_then(Node::as_list)
            .map(|list| {
                list.items()
                    .filter_map(|(_, item)| item.as_object())
                    .filter_map(|argument| {
                        let key = argument.get(Z_ARGUMENT_KEY).and_then(Node::terminal_value)?;
                        let value_type = argument.get(Z_ARGUMENT_TYPE).map(to_normal)?;
                        Some(ArgumentSchema {
                            key: key.to_string(),
                            value_type,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: id.into(),
            arguments,
            output: definition.get(Z_FUNCTION_RETURN_TYPE).map(to_normal),
        }
    }
}

/// Returns `true` for the boolean `true` in any representation.
pub fn is_true(node: &Node) -> bool {
    if node.reference_id() == Some(Z_BOOLEAN_TRUE) {
        return true;
    }
    node.as_object().is_some_and(|object| {
        object.is_type(Z_BOOLEAN)
            && object
                .get(Z_BOOLEAN_IDENTITY)
                .and_then(Node::reference_id)
                == Some(Z_BOOLEAN_TRUE)
    })
}

/// The `(language, text)` entries of a `Z12` multilingual text.
pub fn multilingual_entries(node: &Node) -> Vec<(&str, &str)> {
    node.as_object()
        .and_then(|object| object.get(Z_MULTILINGUAL_STRING_VALUE))
        .and_then(Node::as_list)
        .map(|list| {
            list.items()
                .filter_map(|(_, item)| {
                    let item = item.as_object()?;
                    let lang = item
                        .get(Z_MONOLINGUAL_STRING_LANGUAGE)
                        .and_then(Node::terminal_value)?;
                    let text = item
                        .get(Z_MONOLINGUAL_STRING_VALUE)
                        .and_then(Node::terminal_value)?;
                    Some((lang, text))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Cached knowledge about persisted objects.
#[derive(Debug, Clone, Default)]
pub struct SchemaCache {
    types: HashMap<String, TypeSchema>,
    functions: HashMap<String, FunctionSignature>,
    labels: HashMap<String, IndexMap<String, String>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_schema(&self, id: &str) -> Option<&TypeSchema> {
        self.types.get(id)
    }

    pub fn function_signature(&self, id: &str) -> Option<&FunctionSignature> {
        self.functions.get(id)
    }

    /// Returns `true` if anything has been learned about `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(id) || self.functions.contains_key(id) || self.labels.contains_key(id)
    }

    pub fn insert_type(&mut self, schema: TypeSchema) {
        self.types.insert(schema.id.clone(), schema);
    }

    pub fn insert_function(&mut self, signature: FunctionSignature) {
        self.functions.insert(signature.id.clone(), signature);
    }

    pub fn insert_label(&mut self, id: &str, lang: &str, label: impl Into<String>) {
        self.labels
            .entry(id.to_string())
            .or_default()
            .insert(lang.to_string(), label.into());
    }

    /// The label of `id` in `lang`, falling back to English, then to any.
    pub fn label(&self, id: &str, lang: &str) -> Option<&str> {
        let labels = self.labels.get(id)?;
        labels
            .get(lang)
            .or_else(|| labels.get(Z_LANG_EN))
            .or_else(|| labels.values().next())
            .map(String::as_str)
    }

    /// Learns from a persisted `Z2` object in either form.
    ///
    /// Types contribute their key schema, functions their signature, and
    /// every object its labels. Returns the object's id, or `None` if the
    /// node is not a persisted object.
    pub fn insert_persisted(&mut self, node: &Node) -> Option<String> {
        let object = node.as_object().filter(|o| o.is_type(Z_PERSISTENT_OBJECT))?;
        let id = object
            .get(Z_PERSISTENT_OBJECT_ID)
            .and_then(Node::terminal_value)?
            .to_string();

        if let Some(value) = object.get(Z_PERSISTENT_OBJECT_VALUE).and_then(Node::as_object) {
            match value.type_id() {
                Some(Z_TYPE) => self.insert_type(TypeSchema::from_definition(&id, value)),
                Some(Z_FUNCTION) => self.insert_function(FunctionSignature::from_definition(&id, value)),
                _ => {}
            }
        }

        if let Some(label) = object.get(Z_PERSISTENT_OBJECT_LABEL) {
            for (lang, text) in multilingual_entries(label) {
                self.insert_label(&id, lang, text);
            }
        }

        debug!(zid = %id, "Cached persisted object");
        Some(id)
    }
}
