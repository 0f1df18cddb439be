//! Namespaced documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::node::Node;

/// A mapping from namespace to root [`Node`].
///
/// Each namespace is an independent logical slot: the object being edited
/// (`main`), a pending function call (`call`), its result (`response`), and
/// so on. Mutating one namespace never touches another.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    namespaces: IndexMap<String, Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node of a namespace.
    pub fn root(&self, namespace: &str) -> Option<&Node> {
        self.namespaces.get(namespace)
    }

    pub fn root_mut(&mut self, namespace: &str) -> Option<&mut Node> {
        self.namespaces.get_mut(namespace)
    }

    /// Replaces the root of a namespace, returning the previous root.
    pub fn set_root(&mut self, namespace: impl Into<String>, root: Node) -> Option<Node> {
        self.namespaces.insert(namespace.into(), root)
    }

    /// Drops a namespace entirely.
    pub fn remove_root(&mut self, namespace: &str) -> Option<Node> {
        self.namespaces.shift_remove(namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    /// Names of the populated namespaces, in insertion order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
