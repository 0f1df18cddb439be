//! Function call arguments and other structural edits.

use tracing::debug;

use super::Store;
use crate::{
    Result,
    constants::{
        Z_CODE, Z_FUNCTION_CALL, Z_IMPLEMENTATION, Z_IMPLEMENTATION_CODE,
        Z_IMPLEMENTATION_COMPOSITION, Z_MONOLINGUAL_STRING, Z_MONOLINGUAL_STRINGSET,
        Z_MULTILINGUAL_STRING, Z_MULTILINGUAL_STRING_VALUE, Z_MULTILINGUAL_STRINGSET,
        Z_MULTILINGUAL_STRINGSET_VALUE,
    },
    convert::to_normal,
    factory::CreateOptions,
    model::{ModelError, Node, Path, keys::{is_local_key, local_key, local_key_index}},
};

/// The two ways an implementation can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementationKind {
    /// A function call composing other functions (`Z14K2`)
    Composition,
    /// Source code in a programming language (`Z14K3`)
    Code,
}

impl Store {
    /// Adds a locally keyed argument to the composite at `path`.
    ///
    /// The new key is `K<n+1>` where `n` is the highest local key present.
    pub fn add_local_argument(&mut self, path: impl AsRef<Path>, value: impl Into<Node>) -> Result<String> {
        let path = path.as_ref();
        let object = self.object_mut(path)?;
        let next = object.keys().filter_map(local_key_index).max().unwrap_or(0) + 1;
        let key = local_key(next);
        object.insert(key.as_str(), to_normal(&value.into()));
        debug!(path = %path, key = %key, "Added local argument");
        Ok(key)
    }

    /// Removes the local argument `key` and shifts every higher key down by one.
    ///
    /// Key order is preserved, so local keys stay `K1..Kn` without gaps.
    pub fn remove_local_argument(&mut self, path: impl AsRef<Path>, key: &str) -> Result<Option<Node>> {
        let path = path.as_ref();
        let Some(removed_index) = local_key_index(key) else {
            return Err(ModelError::InvalidPath {
                path: format!("{path}.{key}"),
                reason: "not a local key".to_string(),
            }
            .into());
        };

        let object = self.object_mut(path)?;
        let Some(removed) = object.remove(key) else {
            return Ok(None);
        };
        let mut higher: Vec<usize> = object
            .keys()
            .filter_map(local_key_index)
            .filter(|&index| index > removed_index)
            .collect();
        higher.sort_unstable();
        for index in higher {
            object.rename_key(&local_key(index), local_key(index - 1));
        }
        self.rekey_invalid_items(path, |child| match local_key_index(child) {
            Some(index) if index == removed_index => None,
            Some(index) if index > removed_index => Some(local_key(index - 1)),
            _ => Some(child.to_string()),
        });
        debug!(path = %path, key, "Removed local argument");
        Ok(Some(removed))
    }

    /// Local keys of the composite at `path`, in document order.
    pub fn local_keys(&self, path: impl AsRef<Path>) -> Vec<String> {
        self.read(path)
            .and_then(Node::as_object)
            .map(|object| {
                object
                    .keys()
                    .filter(|key| is_local_key(key))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Makes the node at `path` a call to `function` with its arguments scaffolded.
    ///
    /// When the function's signature is not cached the call starts without
    /// arguments; they are filled in once the signature has been fetched.
    pub fn set_function_call(&mut self, path: impl AsRef<Path>, function: &str) -> Result<()> {
        self.retype_field(
            path,
            Z_FUNCTION_CALL,
            &CreateOptions::new().value(function),
        )
    }

    /// Switches the implementation at `path` between composition and code.
    pub fn set_implementation_kind(
        &mut self,
        path: impl AsRef<Path>,
        kind: ImplementationKind,
    ) -> Result<()> {
        let path = path.as_ref();
        let (keep, replaced, value_type) = match kind {
            ImplementationKind::Composition => {
                (Z_IMPLEMENTATION_COMPOSITION, Z_IMPLEMENTATION_CODE, Z_FUNCTION_CALL)
            }
            ImplementationKind::Code => {
                (Z_IMPLEMENTATION_CODE, Z_IMPLEMENTATION_COMPOSITION, Z_CODE)
            }
        };

        let replaced_path = path.to_path_buf().push(replaced);
        let object = self.object_mut(path)?;
        if !object.is_type(Z_IMPLEMENTATION) {
            return Err(ModelError::ShapeMismatch {
                path: path.to_string(),
                expected: "implementation",
                actual: "object",
            }
            .into());
        }
        if object.contains_key(keep) {
            object.remove(replaced);
            self.dismiss_pending(&replaced_path);
            self.forget_invalid_items(&replaced_path);
            return Ok(());
        }

        let value = self.factory().create(value_type, &CreateOptions::new())?;
        let object = self.object_mut(path)?;
        object.remove(replaced);
        object.insert(keep, value);
        self.dismiss_pending(&replaced_path);
        self.forget_invalid_items(&replaced_path);
        debug!(path = %path, ?kind, "Switched implementation kind");
        Ok(())
    }

    /// Appends an empty entry in `lang` to the multilingual text or stringset at `path`.
    ///
    /// Returns the index of the new entry.
    pub fn add_language(&mut self, path: impl AsRef<Path>, lang: &str) -> Result<usize> {
        let path = path.as_ref();
        let (list_key, entry_type) = match self.read(path).and_then(Node::type_id) {
            Some(Z_MULTILINGUAL_STRING) => (Z_MULTILINGUAL_STRING_VALUE, Z_MONOLINGUAL_STRING),
            Some(Z_MULTILINGUAL_STRINGSET) => {
                (Z_MULTILINGUAL_STRINGSET_VALUE, Z_MONOLINGUAL_STRINGSET)
            }
            _ => {
                return Err(ModelError::ShapeMismatch {
                    path: path.to_string(),
                    expected: "multilingual text",
                    actual: self.read(path).map(Node::type_name).unwrap_or("nothing"),
                }
                .into());
            }
        };
        let entry = self
            .factory()
            .create(entry_type, &CreateOptions::new().lang(lang).append())?;
        let list_path = path.to_path_buf().push(list_key);
        let index = self.list_mut(&list_path)?.push(entry);
        debug!(path = %path, lang, index, "Added language entry");
        Ok(index)
    }
}
