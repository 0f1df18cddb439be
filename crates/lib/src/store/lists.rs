//! Typed list editing. Index 0, the marker item, is never touched.

use std::collections::BTreeSet;

use tracing::debug;

use super::{InvalidItems, Store};
use crate::{
    Result,
    convert::to_normal,
    model::{IndexOutOfRange, ModelError, Node, Path, PathBuf, Segment},
};

fn invalid_index(path: &Path, err: IndexOutOfRange) -> crate::Error {
    ModelError::InvalidIndex {
        path: path.to_string(),
        index: err.index,
        len: err.len,
    }
    .into()
}

impl Store {
    /// Appends normalized items to the list at `path`. Returns their indices.
    pub fn append_items(
        &mut self,
        path: impl AsRef<Path>,
        values: impl IntoIterator<Item = Node>,
    ) -> Result<Vec<usize>> {
        let path = path.as_ref();
        let list = self.list_mut(path)?;
        let indices: Vec<usize> = values
            .into_iter()
            .map(|value| list.push(to_normal(&value)))
            .collect();
        debug!(path = %path, count = indices.len(), "Appended list items");
        Ok(indices)
    }

    /// Deletes the items at `indices` from the list at `path`.
    ///
    /// Indices are validated before anything is removed and removed highest
    /// first. Returns the removed items in ascending index order.
    pub fn delete_items_at(&mut self, path: impl AsRef<Path>, indices: &[usize]) -> Result<Vec<Node>> {
        let path = path.as_ref();
        let removed = self
            .list_mut(path)?
            .remove_indices(indices)
            .map_err(|err| invalid_index(path, err))?;
        let gone: BTreeSet<usize> = indices.iter().copied().collect();
        self.remap_invalid_items(path, |index| {
            (!gone.contains(&index)).then(|| index - gone.range(..index).count())
        });
        debug!(path = %path, count = removed.len(), "Deleted list items");
        Ok(removed)
    }

    /// Moves the list item at `path` by `offset` positions.
    ///
    /// `path` names the item itself (`main.Z2K2.Z8K1.2`). Returns the item's
    /// new path.
    pub fn move_item(&mut self, path: impl AsRef<Path>, offset: isize) -> Result<String> {
        let path = path.as_ref();
        let (list_path, index) = split_item_path(path)?;
        let new_index = self
            .list_mut(&list_path)?
            .move_item(index, offset)
            .map_err(|err| invalid_index(path, err))?;
        self.remap_invalid_items(&list_path, |i| {
            Some(match i {
                i if i == index => new_index,
                i if index < i && i <= new_index => i - 1,
                i if new_index <= i && i < index => i + 1,
                i => i,
            })
        });
        debug!(path = %path, offset, new_index, "Moved list item");
        Ok(list_path.push_index(new_index).to_string())
    }

    /// Flags a list item for removal at the next submission.
    pub fn mark_invalid_item(&mut self, list_path: impl AsRef<Path>, index: usize) -> Result<()> {
        let list_path = list_path.as_ref();
        let list = self.list_mut(list_path)?;
        if index == 0 || index > list.len() {
            return Err(invalid_index(
                list_path,
                IndexOutOfRange {
                    index: index as isize,
                    len: list.len(),
                },
            ));
        }
        self.invalid_items
            .entry(list_path.to_string())
            .or_default()
            .insert(index);
        Ok(())
    }

    /// Removes a flag set by [`mark_invalid_item`](Self::mark_invalid_item).
    pub fn clear_invalid_item(&mut self, list_path: impl AsRef<Path>, index: usize) {
        let key = list_path.as_ref().as_str();
        if let Some(indices) = self.invalid_items.get_mut(key) {
            indices.remove(&index);
            if indices.is_empty() {
                self.invalid_items.remove(key);
            }
        }
    }

    pub fn invalid_items(&self) -> &InvalidItems {
        &self.invalid_items
    }

    /// Drops every flag at or below `path`, whose value is being replaced.
    pub(super) fn forget_invalid_items(&mut self, path: &Path) {
        self.invalid_items
            .retain(|list_path, _| !PathBuf::from(list_path.as_str()).starts_with(path));
        if let (Some(list_path), Some(index)) = (
            path.parent(),
            path.last().and_then(|last| Segment::parse(last).as_index()),
        ) {
            self.clear_invalid_item(list_path, index);
        }
    }

    /// Moves the flags of the list at `list_path` along with its items.
    ///
    /// `remap` gives the new index of an item, `None` once it is removed.
    fn remap_invalid_items(&mut self, list_path: &Path, remap: impl Fn(usize) -> Option<usize>) {
        if let Some(indices) = self.invalid_items.remove(list_path.as_str()) {
            let moved: BTreeSet<usize> = indices.into_iter().filter_map(&remap).collect();
            if !moved.is_empty() {
                self.invalid_items.insert(list_path.as_str().to_string(), moved);
            }
        }
        self.rekey_invalid_items(list_path, |child| {
            Segment::parse(child)
                .as_index()
                .and_then(&remap)
                .map(|index| index.to_string())
        });
    }

    /// Re-keys flagged lists nested below `parent` after its children moved.
    ///
    /// `rekey` maps the old child key to the new one, `None` once the child
    /// is gone, in which case the flags below it are dropped.
    pub(super) fn rekey_invalid_items(
        &mut self,
        parent: &Path,
        rekey: impl Fn(&str) -> Option<String>,
    ) {
        let depth = parent.len();
        let nested: Vec<String> = self
            .invalid_items
            .keys()
            .filter(|key| {
                let key = PathBuf::from(key.as_str());
                key.len() > depth && key.starts_with(parent)
            })
            .cloned()
            .collect();
        // Take every entry out first so re-keyed paths never collide with old ones
        let nested: Vec<(String, BTreeSet<usize>)> = nested
            .into_iter()
            .filter_map(|key| self.invalid_items.remove_entry(&key))
            .collect();

        for (key, indices) in nested {
            let key_path = PathBuf::from(key.as_str());
            let mut rest = key_path.components().skip(depth);
            let Some(child) = rest.next().and_then(&rekey) else {
                debug!(path = %key, "Dropped flags of a removed item");
                continue;
            };
            let rekeyed = rest.fold(parent.to_path_buf().push(child), |path, component| {
                path.push(component)
            });
            self.invalid_items
                .entry(rekeyed.as_str().to_string())
                .or_default()
                .extend(indices);
        }
    }
}

/// Splits `list.path.3` into `list.path` and `3`.
fn split_item_path(path: &Path) -> Result<(crate::model::PathBuf, usize)> {
    let invalid = || ModelError::InvalidPath {
        path: path.to_string(),
        reason: "expected the path of a list item".to_string(),
    };
    let index = path
        .last()
        .and_then(|last| Segment::parse(last).as_index())
        .ok_or_else(invalid)?;
    let parent = path.parent().ok_or_else(invalid)?;
    Ok((parent, index))
}

#[cfg(test)]
mod tests {
    use crate::{
        config::EditorContext,
        constants::NS_MAIN,
        factory::CreateOptions,
        model::{ModelError, Node},
        store::Store,
    };

    const ARGUMENTS: &str = "main.Z2K2.Z8K1";

    fn store() -> Store {
        let mut store = Store::new(EditorContext::default());
        store
            .create_root(NS_MAIN, "Z2", &CreateOptions::new().value("Z8"))
            .unwrap();
        store
    }

    fn arguments(store: &Store) -> usize {
        store.read(ARGUMENTS).and_then(Node::as_list).map(|l| l.len()).unwrap()
    }

    #[test]
    fn test_append_then_delete_restores_list() {
        let mut store = store();
        store.delete_items_at(ARGUMENTS, &[1]).unwrap();
        let before = store.read(ARGUMENTS).cloned();

        let indices = store.append_items(ARGUMENTS, [Node::from("x")]).unwrap();
        assert_eq!(indices, vec![1]);
        assert_eq!(store.read("main.Z2K2.Z8K1.1"), Some(&Node::string("x")));

        store.delete_items_at(ARGUMENTS, &[1]).unwrap();
        assert_eq!(store.read(ARGUMENTS).cloned(), before);
        assert_eq!(arguments(&store), 0);
    }

    #[test]
    fn test_list_errors() {
        let mut store = store();
        let err = store.append_items("main.Z2K2.Z8K2", [Node::from("x")]).unwrap_err();
        assert!(matches!(err, crate::Error::Model(ModelError::NotAnArray { .. })));

        let err = store.delete_items_at(ARGUMENTS, &[0]).unwrap_err();
        assert!(matches!(err, crate::Error::Model(ModelError::InvalidIndex { index: 0, .. })));

        let err = store.delete_items_at(ARGUMENTS, &[1, 2]).unwrap_err();
        assert!(matches!(err, crate::Error::Model(ModelError::InvalidIndex { index: 2, .. })));
        assert_eq!(arguments(&store), 1);
    }

    #[test]
    fn test_move_item() {
        let mut store = store();
        store
            .append_items(ARGUMENTS, [Node::from("second"), Node::from("third")])
            .unwrap();
        let moved = store.move_item("main.Z2K2.Z8K1.3", -2).unwrap();
        assert_eq!(moved, "main.Z2K2.Z8K1.1");
        assert_eq!(store.read(&moved), Some(&Node::string("third")));
        assert!(store.move_item("main.Z2K2.Z8K1.1", -1).is_err());
        assert!(store.move_item("main.Z2K2.Z8K1", 1).is_err());
    }

    #[test]
    fn test_mark_invalid_item() {
        let mut store = store();
        store.mark_invalid_item(ARGUMENTS, 1).unwrap();
        assert!(store.mark_invalid_item(ARGUMENTS, 0).is_err());
        assert!(store.mark_invalid_item(ARGUMENTS, 2).is_err());
        assert_eq!(store.invalid_items().get(ARGUMENTS).map(|s| s.len()), Some(1));
        store.clear_invalid_item(ARGUMENTS, 1);
        assert!(store.invalid_items().is_empty());
    }

    #[test]
    fn test_nested_flags_follow_their_parents() {
        let mut store = store();
        let labelled: Node = serde_json::from_str(
            r#"{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z0K2","Z17K3":{"Z1K1":"Z12",
                "Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":""}]}}"#,
        )
        .unwrap();
        store.append_items(ARGUMENTS, [labelled]).unwrap();
        store.mark_invalid_item("main.Z2K2.Z8K1.2.Z17K3.Z12K1", 1).unwrap();

        store.delete_items_at(ARGUMENTS, &[1]).unwrap();
        let flagged: Vec<&str> = store.invalid_items().keys().map(String::as_str).collect();
        assert_eq!(flagged, ["main.Z2K2.Z8K1.1.Z17K3.Z12K1"]);

        store.delete_items_at(ARGUMENTS, &[1]).unwrap();
        assert!(store.invalid_items().is_empty());
    }

    #[test]
    fn test_flags_follow_renumbered_local_keys() {
        let mut store = Store::new(EditorContext::default());
        store
            .create_root(NS_MAIN, "Z7", &CreateOptions::new().value("Z10100"))
            .unwrap();
        let list: Node = serde_json::from_str(r#"["Z6","a","b"]"#).unwrap();
        store.add_local_argument(NS_MAIN, "first").unwrap();
        store.add_local_argument(NS_MAIN, list).unwrap();
        store.mark_invalid_item("main.K2", 2).unwrap();

        store.remove_local_argument(NS_MAIN, "K1").unwrap();
        let flagged: Vec<&str> = store.invalid_items().keys().map(String::as_str).collect();
        assert_eq!(flagged, ["main.K1"]);

        store.remove_local_argument(NS_MAIN, "K1").unwrap();
        assert!(store.invalid_items().is_empty());
    }
}
