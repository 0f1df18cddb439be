//! Path resolution.
//!
//! [`resolve`] and [`resolve_mut`] walk a [`Document`] one key at a time and
//! return the container that holds the final key together with that key.
//! Every intermediate key must lead to an existing composite or list; the
//! final key does not have to exist yet, so the same location serves reads
//! (which may find nothing) and writes (which create the key).
//!
//! Resolution has no side effects and either yields exactly one location or
//! fails with [`ModelError::PathNotFound`].

use super::{
    document::Document,
    errors::ModelError,
    list::ZList,
    node::{Node, ZObject},
    path::{Path, Segment},
};

/// The container a path's final key lives in.
#[derive(Debug, Clone, Copy)]
pub enum Container<'a> {
    /// The final key is a namespace
    Document(&'a Document),
    Object(&'a ZObject),
    List(&'a ZList),
}

/// Mutable counterpart of [`Container`].
#[derive(Debug)]
pub enum ContainerMut<'a> {
    Document(&'a mut Document),
    Object(&'a mut ZObject),
    List(&'a mut ZList),
}

/// A resolved, read-only location.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a, 'p> {
    pub container: Container<'a>,
    pub key: &'p str,
}

impl<'a> Location<'a, '_> {
    /// The value at the final key, if it exists.
    pub fn value(&self) -> Option<&'a Node> {
        match self.container {
            Container::Document(document) => document.root(self.key),
            Container::Object(object) => object.get(self.key),
            Container::List(list) => list_index(self.key).and_then(|index| list.get(index)),
        }
    }
}

/// A resolved, writable location.
#[derive(Debug)]
pub struct LocationMut<'a, 'p> {
    pub container: ContainerMut<'a>,
    pub key: &'p str,
    path: &'p Path,
}

impl<'a> LocationMut<'a, '_> {
    pub fn value(&self) -> Option<&Node> {
        match &self.container {
            ContainerMut::Document(document) => document.root(self.key),
            ContainerMut::Object(object) => object.get(self.key),
            ContainerMut::List(list) => list_index(self.key).and_then(|index| list.get(index)),
        }
    }

    /// The value at the final key, borrowed for the container's lifetime.
    pub fn into_value_mut(self) -> Option<&'a mut Node> {
        match self.container {
            ContainerMut::Document(document) => document.root_mut(self.key),
            ContainerMut::Object(object) => object.get_mut(self.key),
            ContainerMut::List(list) => list_index(self.key).and_then(|index| list.get_mut(index)),
        }
    }

    /// Assigns the final key, creating it if needed. Returns the old value.
    ///
    /// In a list the key may name an existing element or the position just
    /// past the end.
    pub fn set(self, value: Node) -> Result<Option<Node>, ModelError> {
        match self.container {
            ContainerMut::Document(document) => Ok(document.set_root(self.key, value)),
            ContainerMut::Object(object) => Ok(object.insert(self.key, value)),
            ContainerMut::List(list) => {
                let index = list_index(self.key).unwrap_or(usize::MAX);
                list.set(index, value)
                    .map_err(|err| ModelError::InvalidIndex {
                        path: self.path.to_string(),
                        index: err.index,
                        len: err.len,
                    })
            }
        }
    }

    /// Deletes the final key. Returns the removed value.
    ///
    /// Deleting from a list removes a data item; the marker cannot be deleted.
    pub fn remove(self) -> Result<Option<Node>, ModelError> {
        match self.container {
            ContainerMut::Document(document) => Ok(document.remove_root(self.key)),
            ContainerMut::Object(object) => Ok(object.remove(self.key)),
            ContainerMut::List(list) => {
                let index = list_index(self.key).unwrap_or(usize::MAX);
                list.remove(index)
                    .map(Some)
                    .map_err(|err| ModelError::InvalidIndex {
                        path: self.path.to_string(),
                        index: err.index,
                        len: err.len,
                    })
            }
        }
    }
}

fn list_index(key: &str) -> Option<usize> {
    Segment::parse(key).as_index()
}

fn not_found(path: &Path, segment: &str) -> ModelError {
    ModelError::PathNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}

/// Splits a path into namespace, intermediate keys and final key.
fn split(path: &Path) -> Result<(&str, Vec<&str>), ModelError> {
    let mut components = path.components();
    let namespace = components.next().ok_or_else(|| ModelError::InvalidPath {
        path: path.to_string(),
        reason: "path must start with a namespace".to_string(),
    })?;
    Ok((namespace, components.collect()))
}

/// Resolves `path` against `document` for reading.
pub fn resolve<'a, 'p>(
    document: &'a Document,
    path: &'p Path,
) -> Result<Location<'a, 'p>, ModelError> {
    let (namespace, rest) = split(path)?;
    let Some((&last, intermediate)) = rest.split_last() else {
        return Ok(Location {
            container: Container::Document(document),
            key: namespace,
        });
    };

    let mut current = document
        .root(namespace)
        .ok_or_else(|| not_found(path, namespace))?;
    for key in intermediate {
        current = match current {
            Node::Object(object) => object.get(key),
            Node::List(list) => list_index(key).and_then(|index| list.get(index)),
            Node::Text(_) => None,
        }
        .ok_or_else(|| not_found(path, key))?;
    }

    let container = match current {
        Node::Object(object) => Container::Object(object),
        Node::List(list) if list_index(last).is_some() => Container::List(list),
        _ => return Err(not_found(path, last)),
    };
    Ok(Location {
        container,
        key: last,
    })
}

/// Resolves `path` against `document` for writing.
pub fn resolve_mut<'a, 'p>(
    document: &'a mut Document,
    path: &'p Path,
) -> Result<LocationMut<'a, 'p>, ModelError> {
    let (namespace, rest) = split(path)?;
    let Some((&last, intermediate)) = rest.split_last() else {
        return Ok(LocationMut {
            container: ContainerMut::Document(document),
            key: namespace,
            path,
        });
    };

    let mut current = document
        .root_mut(namespace)
        .ok_or_else(|| not_found(path, namespace))?;
    for key in intermediate {
        current = match current {
            Node::Object(object) => object.get_mut(key),
            Node::List(list) => list_index(key).and_then(|index| list.get_mut(index)),
            Node::Text(_) => None,
        }
        .ok_or_else(|| not_found(path, key))?;
    }

    let container = match current {
        Node::Object(object) => ContainerMut::Object(object),
        Node::List(list) if list_index(last).is_some() => ContainerMut::List(list),
        _ => return Err(not_found(path, last)),
    };
    Ok(LocationMut {
        container,
        key: last,
        path,
    })
}
