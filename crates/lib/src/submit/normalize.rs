//! Cleanup of an edited object before it is persisted.
//!
//! Editing leaves scaffolding behind: blank label entries, arguments the user
//! never filled in, type functions left unset. Normalization removes it and
//! renumbers keys so the saved object has no gaps. Running it twice gives the
//! same result as running it once.

use tracing::debug;

use super::{is_empty_argument, is_unset, persistent_value_mut};
use crate::{
    constants::*,
    model::{Node, PathBuf, Segment, ZObject, keys::global_key},
    store::InvalidItems,
};

/// Switches for [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Namespace of the normalized root, used to pick its tracked invalid items
    pub namespace: String,
    /// Empty the function's tester and implementation lists
    pub disconnect: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            namespace: NS_MAIN.to_string(),
            disconnect: false,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn disconnect(mut self, disconnect: bool) -> Self {
        self.disconnect = disconnect;
        self
    }
}

/// Normalizes the object rooted at `root` in place.
///
/// Steps, in order:
///
/// 1. Items tracked in `invalid_items` for this namespace are removed and their
///    tracking is cleared. This runs first so the tracked indices still refer
///    to the layout the user edited.
/// 2. Monolingual entries with an empty text or language are removed from
///    every multilingual text and stringset, as are empty strings in sets.
/// 3. Function: arguments with neither a type nor a label are dropped and the
///    remaining argument keys renumbered `<id>K1..n`. With `disconnect` the
///    tester and implementation lists are emptied.
/// 4. Type: unset type functions are dropped, keys renumbered `<id>K1..n` and
///    unset identity flags set to false.
pub fn normalize(root: &mut Node, invalid_items: &mut InvalidItems, options: &NormalizeOptions) {
    remove_invalid_items(root, invalid_items, &options.namespace);
    prune_multilingual(root);

    let object_id = root
        .as_object()
        .filter(|object| object.is_type(Z_PERSISTENT_OBJECT))
        .and_then(|object| object.get(Z_PERSISTENT_OBJECT_ID))
        .and_then(Node::terminal_value)
        .filter(|id| !id.is_empty())
        .unwrap_or(NEW_OBJECT_ID)
        .to_string();

    let Some(value) = persistent_value_mut(root) else {
        return;
    };
    match value.type_id() {
        Some(Z_FUNCTION) => normalize_function(value, &object_id, options.disconnect),
        Some(Z_TYPE) => normalize_type(value, &object_id),
        _ => {}
    }
}

fn remove_invalid_items(root: &mut Node, invalid_items: &mut InvalidItems, namespace: &str) {
    let tracked: Vec<String> = invalid_items
        .keys()
        .filter(|list_path| PathBuf::from(list_path.as_str()).namespace() == Some(namespace))
        .cloned()
        .collect();

    // Deepest lists first, so removals never shift a path still to be visited
    for list_path in tracked.into_iter().rev() {
        let Some(indices) = invalid_items.remove(&list_path) else {
            continue;
        };
        let path = PathBuf::from(list_path.as_str());
        let Some(list) = descend_mut(root, path.components().skip(1)).and_then(Node::as_list_mut)
        else {
            debug!(path = %path, "Tracked list no longer exists");
            continue;
        };
        let indices: Vec<usize> = indices
            .into_iter()
            .filter(|&index| index >= 1 && index <= list.len())
            .collect();
        if let Ok(removed) = list.remove_indices(&indices) {
            debug!(path = %path, count = removed.len(), "Removed invalid list items");
        }
    }
}

fn descend_mut<'a, 'p>(
    node: &'a mut Node,
    mut components: impl Iterator<Item = &'p str>,
) -> Option<&'a mut Node> {
    components.try_fold(node, |node, component| match Segment::parse(component) {
        Segment::Key(key) => node.as_object_mut()?.get_mut(key),
        Segment::Index(index) => node.as_list_mut()?.get_mut(index),
    })
}

fn prune_multilingual(node: &mut Node) {
    let object = match node {
        Node::Text(_) => return,
        Node::List(list) => {
            list.items_mut().for_each(|(_, item)| prune_multilingual(item));
            return;
        }
        Node::Object(object) => object,
    };
    for (_, value) in object.iter_mut() {
        prune_multilingual(value);
    }

    match object.type_id() {
        Some(Z_MULTILINGUAL_STRING) => {
            retain_entries(object, Z_MULTILINGUAL_STRING_VALUE, is_complete_text);
        }
        Some(Z_MULTILINGUAL_STRINGSET) => {
            retain_entries(object, Z_MULTILINGUAL_STRINGSET_VALUE, is_complete_set);
        }
        Some(Z_MONOLINGUAL_STRINGSET) => {
            retain_entries(object, Z_MONOLINGUAL_STRINGSET_VALUE, |text| {
                !text.is_blank_terminal()
            });
        }
        _ => {}
    }
}

fn retain_entries(object: &mut ZObject, list_key: &str, keep: impl FnMut(&Node) -> bool) {
    if let Some(entries) = object.get_mut(list_key).and_then(Node::as_list_mut) {
        entries.retain_items(keep);
    }
}

fn is_complete_text(entry: &Node) -> bool {
    entry.as_object().is_some_and(|entry| {
        !is_unset(entry.get(Z_MONOLINGUAL_STRING_LANGUAGE))
            && !is_unset(entry.get(Z_MONOLINGUAL_STRING_VALUE))
    })
}

fn is_complete_set(entry: &Node) -> bool {
    entry.as_object().is_some_and(|entry| {
        !is_unset(entry.get(Z_MONOLINGUAL_STRINGSET_LANGUAGE))
            && entry
                .get(Z_MONOLINGUAL_STRINGSET_VALUE)
                .and_then(Node::as_list)
                .is_some_and(|strings| !strings.is_empty())
    })
}

fn normalize_function(function: &mut ZObject, object_id: &str, disconnect: bool) {
    if let Some(arguments) = function
        .get_mut(Z_FUNCTION_ARGUMENTS)
        .and_then(Node::as_list_mut)
    {
        arguments.retain_items(|argument| !is_empty_argument(argument));
        for (position, (_, argument)) in arguments.items_mut().enumerate() {
            if let Some(argument) = argument.as_object_mut() {
                argument.insert(
                    Z_ARGUMENT_KEY,
                    Node::string(global_key(object_id, position + 1)),
                );
            }
        }
    }

    if disconnect {
        for key in [Z_FUNCTION_TESTERS, Z_FUNCTION_IMPLEMENTATIONS] {
            if let Some(list) = function.get_mut(key).and_then(Node::as_list_mut) {
                list.clear_items();
            }
        }
    }
}

fn normalize_type(ty: &mut ZObject, object_id: &str) {
    for key in Z_TYPE_FUNCTION_KEYS {
        if ty.contains_key(key) && is_unset(ty.get(key)) {
            ty.remove(key);
        }
    }

    let Some(keys) = ty.get_mut(Z_TYPE_KEYS).and_then(Node::as_list_mut) else {
        return;
    };
    for (position, (_, key)) in keys.items_mut().enumerate() {
        let Some(key) = key.as_object_mut() else {
            continue;
        };
        key.insert(Z_KEY_ID, Node::string(global_key(object_id, position + 1)));
        if is_unset_boolean(key.get(Z_KEY_IS_IDENTITY)) {
            key.insert(
                Z_KEY_IS_IDENTITY,
                ZObject::new(Node::reference(Z_BOOLEAN))
                    .with(Z_BOOLEAN_IDENTITY, Node::reference(Z_BOOLEAN_FALSE)),
            );
        }
    }
}

fn is_unset_boolean(node: Option<&Node>) -> bool {
    match node.and_then(Node::as_object) {
        Some(object) if object.is_type(Z_BOOLEAN) => is_unset(object.get(Z_BOOLEAN_IDENTITY)),
        _ => is_unset(node),
    }
}
