//! External service seams.
//!
//! The editor consumes three collaborators as opaque request/response
//! services, all exchanging canonical JSON:
//!
//! - [`ObjectSource`] looks up persisted objects (type definitions, function
//!   signatures, labels) by id.
//! - [`PersistenceService`] saves a canonical object and returns a [`Revision`].
//! - [`EvaluationService`] evaluates a canonical function call.
//!
//! Lookups requested by the [`Store`](crate::store::Store) are run in the
//! background by a [`FetchDispatcher`]. Every finished lookup is sent back as
//! a [`FetchEvent`] on a channel owned by whoever owns the store, which feeds
//! the events to [`Store::apply_fetch_event`](crate::store::Store::apply_fetch_event).
//!
//! [`InMemoryObjects`] implements the source and persistence seams over a map
//! that can be saved to and loaded from a JSON file.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::{model::Node, store::Store};

pub mod errors;
pub mod memory;

pub use errors::ServiceError;
pub use memory::InMemoryObjects;

/// Looks up persisted objects by id.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Fetches the canonical persistent object (`Z2`) stored under `id`.
    ///
    /// Returns `Ok(None)` when nothing is stored under the id.
    async fn fetch_object(&self, id: &str) -> Result<Option<Node>, ServiceError>;
}

/// Saves canonical objects.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Saves `canonical`, a persistent object, under `target` or a new id.
    ///
    /// `summary` is the edit summary recorded with the revision.
    async fn save(
        &self,
        canonical: &Node,
        target: Option<&str>,
        summary: &str,
    ) -> Result<Revision, ServiceError>;
}

/// Evaluates function calls.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    /// Evaluates the canonical function call and returns its canonical result.
    async fn call(&self, call: &Node) -> Result<Node, ServiceError>;
}

/// A saved revision of a persisted object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Id the object was saved under
    pub id: String,
    /// Revision number, starting at 1 for a new object
    pub revision: u64,
}

/// The outcome of one background lookup.
#[derive(Debug, Clone)]
pub enum FetchEvent {
    /// The canonical object stored under `id`
    Fetched { id: String, object: Node },
    /// The lookup failed; placeholders waiting for `id` stay as they are
    Failed { id: String, error: ServiceError },
}

impl FetchEvent {
    /// The id that was looked up.
    pub fn id(&self) -> &str {
        match self {
            FetchEvent::Fetched { id, .. } | FetchEvent::Failed { id, .. } => id,
        }
    }
}

/// Runs object lookups as background tasks.
///
/// Each dispatched id becomes one `tokio` task that sends exactly one
/// [`FetchEvent`] back on the channel returned by [`FetchDispatcher::new`].
/// Events arrive in completion order, not request order.
#[derive(Clone)]
pub struct FetchDispatcher {
    source: Arc<dyn ObjectSource>,
    events: mpsc::UnboundedSender<FetchEvent>,
}

impl FetchDispatcher {
    /// Creates a dispatcher over `source` and the receiving end of its events.
    pub fn new(source: Arc<dyn ObjectSource>) -> (Self, mpsc::UnboundedReceiver<FetchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { source, events }, receiver)
    }

    /// Spawns a lookup of `id`. Must be called from within a `tokio` runtime.
    pub fn dispatch(&self, id: String) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        trace!(zid = %id, "Dispatching fetch");
        tokio::spawn(async move {
            let event = match source.fetch_object(&id).await {
                Ok(Some(object)) => FetchEvent::Fetched { id, object },
                Ok(None) => FetchEvent::Failed {
                    error: ServiceError::NotFound { id: id.clone() },
                    id,
                },
                Err(error) => FetchEvent::Failed { id, error },
            };
            if events.send(event).is_err() {
                debug!("Fetch event receiver dropped");
            }
        });
    }

    /// Spawns a lookup for every id. Returns how many were spawned.
    pub fn dispatch_all(&self, ids: impl IntoIterator<Item = String>) -> usize {
        ids.into_iter().map(|id| self.dispatch(id)).count()
    }

    /// Fetches everything `store` waits for until no requests remain.
    ///
    /// Patching can uncover further unknown types, so requests are drained
    /// again after every event. Returns the number of placeholders patched.
    pub async fn settle(
        &self,
        store: &mut Store,
        events: &mut mpsc::UnboundedReceiver<FetchEvent>,
    ) -> usize {
        let mut outstanding = self.dispatch_all(store.take_fetch_requests());
        let mut patched = 0;
        while outstanding > 0 {
            let Some(event) = events.recv().await else {
                break;
            };
            outstanding -= 1;
            patched += store.apply_fetch_event(event);
            outstanding += self.dispatch_all(store.take_fetch_requests());
        }
        patched
    }
}

impl std::fmt::Debug for FetchDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchDispatcher")
            .field("closed", &self.events.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EditorContext, constants::NS_MAIN, factory::CreateOptions};

    fn parse(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    async fn objects() -> Arc<InMemoryObjects> {
        let objects = InMemoryObjects::new();
        objects
            .insert(parse(
                r#"{"Z1K1":"Z2","Z2K1":"Z10001","Z2K2":{"Z1K1":"Z4","Z4K1":"Z10001","Z4K2":["Z3",
                    {"Z1K1":"Z3","Z3K1":"Z10002","Z3K2":"Z10001K1"}]}}"#,
            ))
            .await
            .unwrap();
        objects
            .insert(parse(
                r#"{"Z1K1":"Z2","Z2K1":"Z10002","Z2K2":{"Z1K1":"Z4","Z4K1":"Z10002","Z4K2":["Z3",
                    {"Z1K1":"Z3","Z3K1":"Z6","Z3K2":"Z10002K1"}]}}"#,
            ))
            .await
            .unwrap();
        Arc::new(objects)
    }

    #[tokio::test]
    async fn test_dispatch_reports_missing_objects() {
        let (dispatcher, mut events) = FetchDispatcher::new(objects().await);
        dispatcher.dispatch("Z99999".to_string());
        match events.recv().await {
            Some(FetchEvent::Failed { id, error }) => {
                assert_eq!(id, "Z99999");
                assert!(error.is_not_found());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_settle_resolves_nested_types() {
        let (dispatcher, mut events) = FetchDispatcher::new(objects().await);
        let mut store = Store::new(EditorContext::default());
        store
            .create_root(NS_MAIN, "Z10001", &CreateOptions::new())
            .unwrap();

        let patched = dispatcher.settle(&mut store, &mut events).await;
        assert_eq!(patched, 2);
        assert!(store.pending().is_empty());
        assert_eq!(
            store.canonical(NS_MAIN),
            Some(parse(
                r#"{"Z1K1":"Z10001","Z10001K1":{"Z1K1":"Z10002","Z10002K1":""}}"#
            ))
        );
    }
}
