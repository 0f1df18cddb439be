//! An in-memory object store with JSON file persistence.
//!
//! [`InMemoryObjects`] keeps canonical persistent objects keyed by id and
//! implements both [`ObjectSource`] and [`PersistenceService`]. It backs the
//! command line tool and the tests.

use std::{collections::BTreeMap, path::Path};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{ObjectSource, PersistenceService, Revision, ServiceError};
use crate::{
    constants::{NEW_OBJECT_ID, Z_PERSISTENT_OBJECT, Z_PERSISTENT_OBJECT_ID},
    model::{
        Node, ZList, ZObject,
        keys::{global_key, split_global_key},
    },
};

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// First id handed out to a new object.
const FIRST_USER_ID: u64 = 10000;

/// Helper to check if version is default (0) for serde skip_serializing_if
fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the persistence version during deserialization.
fn validate_persistence_version<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// One stored object and its latest revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredObject {
    object: Node,
    revision: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    summary: String,
}

/// On-disk layout of an [`InMemoryObjects`] file.
#[derive(Serialize, Deserialize)]
struct SerializableObjects {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    objects: BTreeMap<String, StoredObject>,
}

/// Canonical persistent objects held in memory.
#[derive(Debug, Default)]
pub struct InMemoryObjects {
    objects: RwLock<BTreeMap<String, StoredObject>>,
}

impl InMemoryObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a persistent object under its own `Z2K1` id, replacing any
    /// previous version.
    pub async fn insert(&self, object: Node) -> Result<Revision, ServiceError> {
        let id = persistent_id(&object)?;
        if id == NEW_OBJECT_ID {
            return Err(ServiceError::Rejected {
                reason: "cannot insert an object without an id".to_string(),
            });
        }
        Ok(self.put(id, object, String::new()).await)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Ids of every stored object, in ascending order.
    pub async fn ids(&self) -> Vec<String> {
        self.objects.read().await.keys().cloned().collect()
    }

    /// The latest revision number of `id`.
    pub async fn revision(&self, id: &str) -> Option<u64> {
        self.objects.read().await.get(id).map(|stored| stored.revision)
    }

    async fn put(&self, id: String, object: Node, summary: String) -> Revision {
        store_object(&mut *self.objects.write().await, id, object, summary)
    }

    /// Saves every object to `path` as JSON.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        let serializable = SerializableObjects {
            version: PERSISTENCE_VERSION,
            objects: self.objects.read().await.clone(),
        };
        let json = serde_json::to_string_pretty(&serializable)?;
        tokio::fs::write(path.as_ref(), json).await?;
        debug!(path = %path.as_ref().display(), "Saved object store");
        Ok(())
    }

    /// Loads objects from a JSON file written by [`save_to_file`](Self::save_to_file).
    ///
    /// A missing file yields an empty store.
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(json) => {
                let serializable: SerializableObjects = serde_json::from_str(&json)?;
                Ok(Self {
                    objects: RwLock::new(serializable.objects),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ObjectSource for InMemoryObjects {
    async fn fetch_object(&self, id: &str) -> Result<Option<Node>, ServiceError> {
        let objects = self.objects.read().await;
        Ok(objects.get(id).map(|stored| stored.object.clone()))
    }
}

#[async_trait]
impl PersistenceService for InMemoryObjects {
    async fn save(
        &self,
        canonical: &Node,
        target: Option<&str>,
        summary: &str,
    ) -> Result<Revision, ServiceError> {
        let own_id = persistent_id(canonical)?;
        let placeholder = own_id == NEW_OBJECT_ID;
        let mut objects = self.objects.write().await;
        let id = match target {
            Some(target) if placeholder || own_id == target => target.to_string(),
            Some(target) => {
                return Err(ServiceError::Rejected {
                    reason: format!("object {own_id} cannot be saved as {target}"),
                });
            }
            None if placeholder => next_id(&objects)?,
            None => own_id,
        };

        let object = if placeholder {
            assign_id(canonical, &id)
        } else {
            canonical.clone()
        };
        let revision = store_object(&mut objects, id, object, summary.to_string());
        drop(objects);
        info!(zid = %revision.id, revision = revision.revision, "Saved object");
        Ok(revision)
    }
}

fn store_object(
    objects: &mut BTreeMap<String, StoredObject>,
    id: String,
    object: Node,
    summary: String,
) -> Revision {
    let revision = objects.get(&id).map_or(1, |stored| stored.revision + 1);
    objects.insert(
        id.clone(),
        StoredObject {
            object,
            revision,
            summary,
        },
    );
    Revision { id, revision }
}

/// The next unused numeric id at or above [`FIRST_USER_ID`].
fn next_id(objects: &BTreeMap<String, StoredObject>) -> Result<String, ServiceError> {
    let highest = objects
        .keys()
        .filter_map(|id| id.strip_prefix('Z')?.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    highest
        .max(FIRST_USER_ID - 1)
        .checked_add(1)
        .map(|next| format!("Z{next}"))
        .ok_or_else(|| ServiceError::Rejected {
            reason: "no numeric ids left".to_string(),
        })
}

/// The `Z2K1` id of a canonical persistent object.
fn persistent_id(object: &Node) -> Result<String, ServiceError> {
    let rejected = |reason: &str| ServiceError::Rejected {
        reason: reason.to_string(),
    };
    let object = object
        .as_object()
        .filter(|object| object.is_type(Z_PERSISTENT_OBJECT))
        .ok_or_else(|| rejected("not a persistent object"))?;
    object
        .get(Z_PERSISTENT_OBJECT_ID)
        .and_then(Node::terminal_value)
        .map(str::to_string)
        .ok_or_else(|| rejected("persistent object has no id"))
}

/// Replaces the placeholder id `Z0` with `id` in keys and texts (`Z0`, `Z0K1`).
fn assign_id(node: &Node, id: &str) -> Node {
    match node {
        Node::Text(text) => Node::Text(assign_id_text(text, id)),
        Node::List(list) => Node::List(ZList::from_items(
            assign_id(list.marker(), id),
            list.items().map(|(_, item)| assign_id(item, id)),
        )),
        Node::Object(object) => Node::Object(
            object
                .iter()
                .map(|(key, value)| (assign_id_text(key, id), assign_id(value, id)))
                .collect::<ZObject>(),
        ),
    }
}

fn assign_id_text(text: &str, id: &str) -> String {
    if text == NEW_OBJECT_ID {
        return id.to_string();
    }
    match split_global_key(text) {
        Some((NEW_OBJECT_ID, index)) => global_key(id, index),
        _ => text.to_string(),
    }
}
