//! The document store.
//!
//! A [`Store`] owns the namespaced [`Document`] being edited together with
//! everything needed to edit it: the [`EditorContext`], the [`SchemaCache`],
//! the [`BuilderRegistry`], the placeholders still waiting for schemas, and
//! the list items flagged invalid during the session.
//!
//! Every operation addresses the document through string key paths
//! (`main.Z2K2.Z8K1.1`). Reads never fail; mutations fail immediately with a
//! [`ModelError`] when the path or the target shape is wrong, since that means
//! the caller built an invalid edit.
//!
//! External data arrives asynchronously. Scaffolding that hits an unknown type
//! or function leaves a placeholder, the store queues the id
//! ([`take_fetch_requests`](Store::take_fetch_requests)), and the fetch result
//! is fed back as a [`FetchEvent`](crate::services::FetchEvent) through
//! [`apply_fetch_event`](Store::apply_fetch_event). A fetch only ever patches
//! placeholders that are still untouched, so the most recent edit always wins.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::{
    Result,
    config::EditorContext,
    constants::{NS_CALL, NS_RESPONSE, Z_REFERENCE_ID, Z_STRING_VALUE},
    convert::{to_canonical, to_normal},
    factory::{BuilderRegistry, CreateOptions, Factory},
    model::{Document, ModelError, Node, Path, PathBuf, ZList, ZObject, resolve, resolve_mut},
    schema::SchemaCache,
    services::EvaluationService,
};

mod arguments;
mod lists;
mod pending;

pub use arguments::ImplementationKind;
pub use pending::Pending;

/// List items flagged invalid, keyed by the list's path.
pub type InvalidItems = BTreeMap<String, BTreeSet<usize>>;

/// The editable state captured before a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    document: Document,
    invalid_items: InvalidItems,
}

/// Path-addressed editing of a function-object document.
#[derive(Debug, Default)]
pub struct Store {
    document: Document,
    context: EditorContext,
    schemas: SchemaCache,
    registry: BuilderRegistry,
    pending: Vec<Pending>,
    outbox: Vec<String>,
    requested: HashSet<String>,
    fetched: HashSet<String>,
    invalid_items: InvalidItems,
}

impl Store {
    pub fn new(context: EditorContext) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Replaces the builder registry.
    pub fn with_registry(mut self, registry: BuilderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut EditorContext {
        &mut self.context
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    pub fn schemas_mut(&mut self) -> &mut SchemaCache {
        &mut self.schemas
    }

    pub fn registry_mut(&mut self) -> &mut BuilderRegistry {
        &mut self.registry
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// A factory over this store's context, schemas and registry.
    pub fn factory(&self) -> Factory<'_> {
        Factory::new(&self.context, &self.schemas, &self.registry)
    }

    /// The value at `path`, or `None` if the path does not resolve.
    pub fn read(&self, path: impl AsRef<Path>) -> Option<&Node> {
        resolve(&self.document, path.as_ref()).ok()?.value()
    }

    /// Assigns `value` at `path`, creating the final key if needed.
    ///
    /// The value is normalized unless the final key is a terminal key
    /// (`Z6K1`, `Z9K1`), which holds raw text. Returns the previous value.
    pub fn write(&mut self, path: impl AsRef<Path>, value: impl Into<Node>) -> Result<Option<Node>> {
        let path = path.as_ref();
        let value = value.into();
        let value = match path.last() {
            Some(Z_STRING_VALUE | Z_REFERENCE_ID) => value,
            _ => to_normal(&value),
        };
        let previous = resolve_mut(&mut self.document, path)?.set(value)?;
        self.dismiss_pending(path);
        self.forget_invalid_items(path);
        debug!(path = %path, "Wrote value");
        Ok(previous)
    }

    /// Deletes the final key of `path` (a whole namespace for a bare namespace).
    pub fn unset(&mut self, path: impl AsRef<Path>) -> Result<Option<Node>> {
        let path = path.as_ref();
        let removed = resolve_mut(&mut self.document, path)?.remove()?;
        self.dismiss_pending(path);
        self.forget_invalid_items(path);
        debug!(path = %path, removed = removed.is_some(), "Unset value");
        Ok(removed)
    }

    /// Replaces the value at `path` with a fresh instance of `type_descriptor`.
    ///
    /// Sibling fields are untouched. Placeholders tracked inside the old value
    /// are dropped, so fetches still in flight for them patch nothing.
    pub fn retype_field(
        &mut self,
        path: impl AsRef<Path>,
        type_descriptor: impl Into<Node>,
        options: &CreateOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        let scaffold = self.factory().scaffold(type_descriptor, options)?;
        resolve_mut(&mut self.document, path)?.set(scaffold.node)?;
        self.dismiss_pending(path);
        self.forget_invalid_items(path);
        debug!(path = %path, "Retyped field");
        self.track(path, scaffold.unresolved);
        Ok(())
    }

    /// Scaffolds a fresh root of `type_descriptor` in `namespace`.
    pub fn create_root(
        &mut self,
        namespace: &str,
        type_descriptor: impl Into<Node>,
        options: &CreateOptions,
    ) -> Result<()> {
        self.retype_field(namespace, type_descriptor, options)
    }

    /// Loads a canonical object into `namespace`, normalizing it.
    pub fn load_canonical(&mut self, namespace: &str, canonical: &Node) {
        let path = PathBuf::from(namespace);
        self.dismiss_pending(&path);
        self.forget_invalid_items(&path);
        self.document.set_root(namespace, to_normal(canonical));
        debug!(namespace, "Loaded canonical object");
    }

    /// The canonical form of a namespace's root.
    pub fn canonical(&self, namespace: &str) -> Option<Node> {
        self.document.root(namespace).map(to_canonical)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            invalid_items: self.invalid_items.clone(),
        }
    }

    /// Puts back a snapshot verbatim.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.document = snapshot.document;
        self.invalid_items = snapshot.invalid_items;
    }

    /// Root of a namespace together with the invalid-item tracking, for the
    /// submission pass.
    pub(crate) fn submission_parts(
        &mut self,
        namespace: &str,
    ) -> Option<(&mut Node, &mut InvalidItems)> {
        let root = self.document.root_mut(namespace)?;
        Some((root, &mut self.invalid_items))
    }

    /// Evaluates the `call` namespace and stores the result in `response`.
    pub async fn run_function_call(&mut self, evaluator: &dyn EvaluationService) -> Result<Node> {
        let call = self.canonical(NS_CALL).ok_or_else(|| ModelError::PathNotFound {
            path: NS_CALL.to_string(),
            segment: NS_CALL.to_string(),
        })?;
        let result = evaluator.call(&call).await?;
        let response = to_normal(&result);
        self.document.set_root(NS_RESPONSE, response.clone());
        debug!("Stored function call response");
        Ok(response)
    }

    /// The composite at `path`.
    fn object_mut(&mut self, path: &Path) -> Result<&mut ZObject> {
        let node = self.node_mut(path)?;
        let actual = node.type_name();
        node.as_object_mut().ok_or_else(|| {
            ModelError::ShapeMismatch {
                path: path.to_string(),
                expected: "object",
                actual,
            }
            .into()
        })
    }

    /// The typed list at `path`.
    fn list_mut(&mut self, path: &Path) -> Result<&mut ZList> {
        let node = self.node_mut(path)?;
        let actual = node.type_name();
        node.as_list_mut().ok_or_else(|| {
            ModelError::NotAnArray {
                path: path.to_string(),
                actual,
            }
            .into()
        })
    }

    /// The existing value at `path`.
    fn node_mut(&mut self, path: &Path) -> Result<&mut Node> {
        let location = resolve_mut(&mut self.document, path)?;
        let key = location.key.to_string();
        location.into_value_mut().ok_or_else(|| {
            ModelError::PathNotFound {
                path: path.to_string(),
                segment: key,
            }
            .into()
        })
    }
}
