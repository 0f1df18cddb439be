//! Editor configuration.
//!
//! [`EditorContext`] carries the settings the Factory, Store and Validator
//! need. It is passed explicitly, never read from ambient state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    constants::{DEFAULT_LINKED_TYPES, NEW_OBJECT_ID, Z_LANG_EN},
};

/// Settings for one editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorContext {
    /// Language new monolingual entries are seeded with.
    pub user_lang: String,
    /// Types scaffolded as reference stubs unless a literal is requested.
    pub linked_types: Vec<String>,
    /// Id of the object being edited; `Z0` until it is first persisted.
    pub object_id: String,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self {
            user_lang: Z_LANG_EN.to_string(),
            linked_types: DEFAULT_LINKED_TYPES.iter().map(|t| t.to_string()).collect(),
            object_id: NEW_OBJECT_ID.to_string(),
        }
    }
}

impl EditorContext {
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.user_lang = lang.into();
        self
    }

    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = id.into();
        self
    }

    /// Returns `true` if `type_id` is edited by reference by default.
    pub fn is_linked_type(&self, type_id: &str) -> bool {
        self.linked_types.iter().any(|t| t == type_id)
    }

    /// Returns `true` while the edited object has never been persisted.
    pub fn is_new_object(&self) -> bool {
        self.object_id == NEW_OBJECT_ID
    }

    /// Loads a context from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
