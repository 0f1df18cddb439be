//! The [`Node`] tree.
//!
//! A function-object document is a tree of three shapes:
//!
//! - [`Node::Text`] - a raw terminal string. In canonical form a text that
//!   matches the reference-id pattern (`Z11`) is a reference, any other text
//!   is a string. In normalized form text only appears under the terminal keys
//!   `Z6K1`/`Z9K1` and as the `Z1K1` tag of strings and references.
//! - [`Node::Object`] - a tagged composite ([`ZObject`]), an insertion-ordered
//!   map from field key to node that always carries its type under `Z1K1`.
//! - [`Node::List`] - a typed sequence ([`ZList`]) whose element 0 is the
//!   type marker.
//!
//! Serialization is the JSON wire shape, so a `Node` can be read from and
//! written to the persistence boundary directly with `serde_json`.
//!
//! ```
//! # use zobject::model::{Node, NodeKind};
//! let node: Node = serde_json::from_str(r#"{"Z1K1":"Z40","Z40K1":"Z41"}"#)?;
//! assert_eq!(node.type_id(), Some("Z40"));
//! assert_eq!(Node::from("Z41").kind(), NodeKind::Reference);
//! assert_eq!(Node::from("hello").kind(), NodeKind::String);
//! # Ok::<(), serde_json::Error>(())
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use super::{keys::is_reference_id, list::ZList};
use crate::constants::{
    Z_OBJECT_TYPE, Z_REFERENCE, Z_REFERENCE_ID, Z_STRING, Z_STRING_VALUE,
};

/// A value in a function-object document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Raw terminal string
    Text(String),
    /// Typed sequence, element 0 is the type marker
    List(ZList),
    /// Tagged composite
    Object(ZObject),
}

/// Semantic kind of a node, independent of canonical/normalized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    String,
    Reference,
    Object,
    List,
}

impl Node {
    /// A raw terminal string.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// A normalized string: `{Z1K1: "Z6", Z6K1: value}`.
    pub fn string(value: impl Into<String>) -> Self {
        Node::Object(
            ZObject::with_raw_type(Z_STRING).with(Z_STRING_VALUE, Node::Text(value.into())),
        )
    }

    /// A normalized reference: `{Z1K1: "Z9", Z9K1: id}`.
    pub fn reference(id: impl Into<String>) -> Self {
        Node::Object(
            ZObject::with_raw_type(Z_REFERENCE).with(Z_REFERENCE_ID, Node::Text(id.into())),
        )
    }

    /// Returns the semantic kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(text) if is_reference_id(text) => NodeKind::Reference,
            Node::Text(_) => NodeKind::String,
            Node::List(_) => NodeKind::List,
            Node::Object(object) => match object.type_id() {
                Some(Z_STRING) => NodeKind::String,
                Some(Z_REFERENCE) => NodeKind::Reference,
                _ => NodeKind::Object,
            },
        }
    }

    /// Returns the shape name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Text(_) => "text",
            Node::List(_) => "list",
            Node::Object(_) => "object",
        }
    }

    /// The literal type identifier of this node, if it has one.
    ///
    /// Texts report `Z6` or `Z9`; objects report their `Z1K1` tag when the tag
    /// is a literal identifier (raw or wrapped in a reference). Objects typed
    /// by a generic or inline type and lists return `None`.
    pub fn type_id(&self) -> Option<&str> {
        match self {
            Node::Text(text) if is_reference_id(text) => Some(Z_REFERENCE),
            Node::Text(_) => Some(Z_STRING),
            Node::Object(object) => object.type_id(),
            Node::List(_) => None,
        }
    }

    /// The payload of a terminal node in either form.
    ///
    /// `"Z11"`, `{Z1K1: Z9, Z9K1: Z11}` and `{Z1K1: Z6, Z6K1: Z11}` all yield
    /// `Z11`. Anything else yields `None`.
    pub fn terminal_value(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Object(object) => match object.type_id() {
                Some(Z_STRING) => object.get(Z_STRING_VALUE).and_then(Node::as_text),
                Some(Z_REFERENCE) => object.get(Z_REFERENCE_ID).and_then(Node::as_text),
                _ => None,
            },
            Node::List(_) => None,
        }
    }

    /// The id this node refers to, if it is a reference in either form.
    pub fn reference_id(&self) -> Option<&str> {
        match self.kind() {
            NodeKind::Reference => self.terminal_value(),
            _ => None,
        }
    }

    /// Returns `true` for a terminal node whose payload is empty.
    pub fn is_blank_terminal(&self) -> bool {
        self.terminal_value().is_some_and(str::is_empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ZObject> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ZObject> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ZList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ZList> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    /// Depth of the tree rooted at this node; terminals have depth 1.
    pub fn depth(&self) -> usize {
        let children = match self {
            Node::Text(_) => return 1,
            Node::List(list) => list.iter().map(Node::depth).max(),
            Node::Object(object) => object.values().map(Node::depth).max(),
        };
        1 + children.unwrap_or(0)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::Text(value)
    }
}

impl From<ZObject> for Node {
    fn from(value: ZObject) -> Self {
        Node::Object(value)
    }
}

impl From<ZList> for Node {
    fn from(value: ZList) -> Self {
        Node::List(value)
    }
}

impl PartialEq<str> for Node {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Node::Text(text) if text == other)
    }
}

impl PartialEq<&str> for Node {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// A tagged composite: field key → [`Node`], insertion ordered.
///
/// The type tag lives under `Z1K1`. Deserialization rejects maps without it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ZObject {
    fields: IndexMap<String, Node>,
}

impl ZObject {
    /// Creates a composite tagged with `type_node`.
    pub fn new(type_node: impl Into<Node>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(Z_OBJECT_TYPE.to_string(), type_node.into());
        Self { fields }
    }

    /// Creates a composite whose tag is the raw text `type_id`.
    ///
    /// Normalized strings and references carry raw tags; every other
    /// normalized composite carries its tag wrapped in a reference.
    pub fn with_raw_type(type_id: &str) -> Self {
        Self::new(Node::text(type_id))
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// The `Z1K1` type tag.
    pub fn type_node(&self) -> Option<&Node> {
        self.fields.get(Z_OBJECT_TYPE)
    }

    /// The literal type id of the tag, if the tag is a literal id.
    pub fn type_id(&self) -> Option<&str> {
        match self.type_node()? {
            Node::Text(text) => Some(text),
            Node::Object(tag) if tag.is_raw(Z_REFERENCE) => {
                tag.get(Z_REFERENCE_ID).and_then(Node::as_text)
            }
            _ => None,
        }
    }

    fn is_raw(&self, type_id: &str) -> bool {
        matches!(self.type_node(), Some(Node::Text(text)) if text == type_id)
    }

    /// Returns `true` if this composite is tagged with `type_id`.
    pub fn is_type(&self, type_id: &str) -> bool {
        self.type_id() == Some(type_id)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.fields.get_mut(key)
    }

    /// Sets a field, returning the previous value. New keys go to the end.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.fields.insert(key.into(), value.into())
    }

    /// Removes a field, preserving the order of the remaining ones.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.fields.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Keeps only the fields for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut Node) -> bool) {
        self.fields.retain(|k, v| keep(k, v));
    }

    /// Renames a field in place, keeping its position.
    pub fn rename_key(&mut self, from: &str, to: impl Into<String>) -> bool {
        let Some(index) = self.fields.get_index_of(from) else {
            return false;
        };
        let to = to.into();
        if let Some(value) = self.fields.shift_remove(from) {
            let (new_index, _) = self.fields.insert_full(to, value);
            self.fields.move_index(new_index, index);
        }
        true
    }
}

impl<'de> Deserialize<'de> for ZObject {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = IndexMap::<String, Node>::deserialize(deserializer)?;
        if !fields.contains_key(Z_OBJECT_TYPE) {
            return Err(serde::de::Error::custom(format!(
                "object is missing its {Z_OBJECT_TYPE} type tag"
            )));
        }
        Ok(Self { fields })
    }
}

impl FromIterator<(String, Node)> for ZObject {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
