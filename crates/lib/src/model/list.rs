//! Typed lists.
//!
//! A [`ZList`] is the sequence shape of the document tree. Element 0 is the
//! *marker item*: the element type descriptor, never a data item. Data items
//! live at indices `1..=len()`. Indices used here are raw indices, the same
//! numbers that appear in key paths (`main.Z2K2.Z8K1.1`).
//!
//! Every mutating operation refuses to touch index 0, so a list can never lose
//! its marker.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::node::Node;

/// A list index was out of range or pointed at the marker item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} is not a data item of a list with {len} items")]
pub struct IndexOutOfRange {
    pub index: isize,
    pub len: usize,
}

/// A typed sequence whose element 0 is the element type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ZList {
    items: Vec<Node>,
}

impl ZList {
    /// Creates an empty list of `marker`-typed items.
    pub fn new(marker: impl Into<Node>) -> Self {
        Self {
            items: vec![marker.into()],
        }
    }

    /// Creates a list from a marker and data items.
    pub fn from_items(marker: impl Into<Node>, items: impl IntoIterator<Item = Node>) -> Self {
        let mut list = Self::new(marker);
        list.items.extend(items);
        list
    }

    /// The element type descriptor.
    pub fn marker(&self) -> &Node {
        &self.items[0]
    }

    /// Replaces the element type descriptor, returning the old one.
    pub fn set_marker(&mut self, marker: Node) -> Node {
        std::mem::replace(&mut self.items[0], marker)
    }

    /// Number of data items (marker excluded).
    pub fn len(&self) -> usize {
        self.items.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements including the marker.
    pub fn raw_len(&self) -> usize {
        self.items.len()
    }

    /// Element at a raw index; index 0 is the marker.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index)
    }

    /// All elements, marker first.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }

    /// All elements, marker first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.items.iter_mut()
    }

    /// Data items with their raw indices.
    pub fn items(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.items.iter().enumerate().skip(1)
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = (usize, &mut Node)> {
        self.items.iter_mut().enumerate().skip(1)
    }

    fn check(&self, index: isize) -> Result<usize, IndexOutOfRange> {
        if index >= 1 && (index as usize) < self.items.len() {
            Ok(index as usize)
        } else {
            Err(IndexOutOfRange {
                index,
                len: self.len(),
            })
        }
    }

    /// Appends a data item, returning its raw index.
    pub fn push(&mut self, item: Node) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Replaces the element at `index`, or appends when `index == raw_len()`.
    pub fn set(&mut self, index: usize, item: Node) -> Result<Option<Node>, IndexOutOfRange> {
        match index.cmp(&self.items.len()) {
            std::cmp::Ordering::Less => Ok(Some(std::mem::replace(&mut self.items[index], item))),
            std::cmp::Ordering::Equal => {
                self.items.push(item);
                Ok(None)
            }
            std::cmp::Ordering::Greater => Err(IndexOutOfRange {
                index: index as isize,
                len: self.len(),
            }),
        }
    }

    /// Removes a single data item.
    pub fn remove(&mut self, index: usize) -> Result<Node, IndexOutOfRange> {
        let index = self.check(index as isize)?;
        Ok(self.items.remove(index))
    }

    /// Removes several data items at once.
    ///
    /// All indices are validated before anything is removed. Removal runs from
    /// the highest index to the lowest so earlier removals never shift later
    /// targets. Duplicates are ignored. Returns the removed items in ascending
    /// index order.
    pub fn remove_indices(&mut self, indices: &[usize]) -> Result<Vec<Node>, IndexOutOfRange> {
        let mut sorted = indices
            .iter()
            .map(|&index| self.check(index as isize))
            .collect::<Result<Vec<_>, _>>()?;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed: Vec<Node> = sorted.into_iter().map(|i| self.items.remove(i)).collect();
        removed.reverse();
        Ok(removed)
    }

    /// Moves the data item at `index` by `offset` positions.
    ///
    /// Both the source and the destination must be data items. Returns the new
    /// raw index.
    pub fn move_item(&mut self, index: usize, offset: isize) -> Result<usize, IndexOutOfRange> {
        let from = self.check(index as isize)?;
        let to = (from as isize)
            .checked_add(offset)
            .ok_or(IndexOutOfRange {
                index: if offset < 0 { isize::MIN } else { isize::MAX },
                len: self.len(),
            })
            .and_then(|to| self.check(to))?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(to)
    }

    /// Keeps only the data items for which `keep` returns `true`.
    pub fn retain_items(&mut self, mut keep: impl FnMut(&Node) -> bool) {
        let mut first = true;
        self.items.retain(|item| {
            if first {
                first = false;
                return true;
            }
            keep(item)
        });
    }

    /// Drops every data item, keeping the marker.
    pub fn clear_items(&mut self) {
        self.items.truncate(1);
    }
}

impl<'de> Deserialize<'de> for ZList {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<Node>::deserialize(deserializer)?;
        if items.is_empty() {
            return Err(serde::de::Error::custom("typed list is missing its type marker"));
        }
        Ok(Self { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(items: &[&str]) -> ZList {
        ZList::from_items(Node::from("Z6"), items.iter().map(|s| Node::from(*s)))
    }

    #[test]
    fn test_len_excludes_marker() {
        let list = list_of(&["a", "b"]);
        assert_eq!(list.len(), 2);
        assert_eq!(list.raw_len(), 3);
        assert!(ZList::new(Node::from("Z6")).is_empty());
    }

    #[test]
    fn test_remove_indices_highest_first() {
        let mut list = list_of(&["a", "b", "c", "d"]);
        let removed = list.remove_indices(&[1, 3, 3]).unwrap();
        assert_eq!(removed, vec![Node::from("a"), Node::from("c")]);
        assert_eq!(list, list_of(&["b", "d"]));
    }

    #[test]
    fn test_remove_indices_is_all_or_nothing() {
        let mut list = list_of(&["a", "b"]);
        let err = list.remove_indices(&[1, 5]).unwrap_err();
        assert_eq!(err, IndexOutOfRange { index: 5, len: 2 });
        assert_eq!(list, list_of(&["a", "b"]));
    }

    #[test]
    fn test_marker_is_protected() {
        let mut list = list_of(&["a", "b"]);
        assert!(list.remove(0).is_err());
        assert!(list.remove_indices(&[0]).is_err());
        assert!(list.move_item(0, 1).is_err());
        assert!(list.move_item(1, -1).is_err());
        assert_eq!(list.marker(), &Node::from("Z6"));
    }

    #[test]
    fn test_move_item() {
        let mut list = list_of(&["a", "b", "c"]);
        assert_eq!(list.move_item(1, 2).unwrap(), 3);
        assert_eq!(list, list_of(&["b", "c", "a"]));
        assert_eq!(list.move_item(3, -1).unwrap(), 2);
        assert_eq!(list, list_of(&["b", "a", "c"]));
        assert!(list.move_item(3, 1).is_err());
    }

    #[test]
    fn test_move_item_extreme_offsets() {
        let mut list = list_of(&["a", "b"]);
        let err = list.move_item(1, isize::MAX).unwrap_err();
        assert_eq!(err.index, isize::MAX);
        assert!(list.move_item(2, isize::MIN).is_err());
        assert_eq!(list, list_of(&["a", "b"]));
    }

    #[test]
    fn test_set_appends_at_end_only() {
        let mut list = list_of(&["a"]);
        assert_eq!(list.set(2, Node::from("b")).unwrap(), None);
        assert_eq!(list.set(1, Node::from("x")).unwrap(), Some(Node::from("a")));
        assert!(list.set(5, Node::from("y")).is_err());
        assert_eq!(list, list_of(&["x", "b"]));
    }

    #[test]
    fn test_retain_items_keeps_marker() {
        let mut list = list_of(&["Z6", "a", "Z6"]);
        list.retain_items(|item| item != "Z6");
        assert_eq!(list, list_of(&["a"]));
    }

    #[test]
    fn test_empty_array_is_rejected() {
        let result: Result<ZList, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
