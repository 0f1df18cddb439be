//! Submission of an edited object.
//!
//! Submitting runs as one logical step:
//!
//! 1. snapshot the store,
//! 2. [`normalize`] the `main` namespace in place,
//! 3. [`validate`] it,
//! 4. convert it to canonical form and hand it to a [`PersistenceService`].
//!
//! A rejected object or a failed save restores the snapshot verbatim, so no
//! half-normalized state leaks back into the editor. Violations are returned
//! as data in [`SubmitOutcome::Rejected`]; a failed save is an error.

use tracing::{info, warn};

use crate::{
    Result,
    constants::{
        NS_MAIN, Z_ARGUMENT_LABEL, Z_ARGUMENT_TYPE, Z_PERSISTENT_OBJECT,
        Z_PERSISTENT_OBJECT_VALUE,
    },
    model::{ModelError, Node, PathBuf, ZObject},
    schema::multilingual_entries,
    services::{PersistenceService, Revision},
    store::Store,
};

pub mod errors;
mod normalize;
mod validate;

pub use errors::SubmitError;
pub use normalize::{NormalizeOptions, normalize};
pub use validate::{ValidationReport, Violation, ViolationKind, validate};

/// Options for [`submit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Edit summary recorded with the revision
    pub summary: String,
    /// Id to save under; defaults to the context's object id for existing objects
    pub target: Option<String>,
    /// Detach all connected implementations and testers
    pub disconnect: bool,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn disconnect(mut self) -> Self {
        self.disconnect = true;
        self
    }
}

/// The result of a submission that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The object was saved
    Saved(Revision),
    /// The object has violations; nothing was saved
    Rejected(ValidationReport),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }

    /// Turns a rejection into [`SubmitError::ValidationFailed`].
    pub fn into_result(self) -> Result<Revision> {
        match self {
            SubmitOutcome::Saved(revision) => Ok(revision),
            SubmitOutcome::Rejected(report) => Err(SubmitError::ValidationFailed {
                violations: report.into_violations(),
            }
            .into()),
        }
    }
}

/// Normalizes, validates and saves the object in the `main` namespace.
///
/// On success the store keeps the normalized document. On rejection or on a
/// persistence failure the store is restored to its state before the call.
pub async fn submit(
    store: &mut Store,
    persistence: &dyn PersistenceService,
    options: &SubmitOptions,
) -> Result<SubmitOutcome> {
    let not_found = || ModelError::PathNotFound {
        path: NS_MAIN.to_string(),
        segment: NS_MAIN.to_string(),
    };
    let snapshot = store.snapshot();

    let report = {
        let (root, invalid_items) = store.submission_parts(NS_MAIN).ok_or_else(not_found)?;
        normalize(
            root,
            invalid_items,
            &NormalizeOptions::new().disconnect(options.disconnect),
        );
        validate(root).under(NS_MAIN)
    };
    if !report.is_valid() {
        warn!(violations = report.len(), "Submission rejected, restoring snapshot");
        store.restore(snapshot);
        return Ok(SubmitOutcome::Rejected(report));
    }

    let canonical = store.canonical(NS_MAIN).ok_or_else(not_found)?;
    let target = options.target.clone().or_else(|| {
        let context = store.context();
        (!context.is_new_object()).then(|| context.object_id.clone())
    });

    match persistence
        .save(&canonical, target.as_deref(), &options.summary)
        .await
    {
        Ok(revision) => {
            info!(zid = %revision.id, revision = revision.revision, "Submitted object");
            Ok(SubmitOutcome::Saved(revision))
        }
        Err(err) => {
            warn!(error = %err, "Persistence failed, restoring snapshot");
            store.restore(snapshot);
            Err(SubmitError::PersistenceFailed {
                reason: err.to_string(),
            }
            .into())
        }
    }
}

/// `true` for a missing field or a terminal with an empty payload.
fn is_unset(node: Option<&Node>) -> bool {
    node.is_none_or(Node::is_blank_terminal)
}

/// An argument declaration with neither a type nor a non-empty label.
fn is_empty_argument(argument: &Node) -> bool {
    argument.as_object().is_some_and(|argument| {
        is_unset(argument.get(Z_ARGUMENT_TYPE))
            && argument
                .get(Z_ARGUMENT_LABEL)
                .is_none_or(|label| {
                    multilingual_entries(label)
                        .iter()
                        .all(|(lang, text)| lang.is_empty() || text.is_empty())
                })
    })
}

/// The value of a persistent object and its path, or `root` itself.
fn persistent_value(root: &Node) -> Option<(&ZObject, PathBuf)> {
    let object = root.as_object()?;
    if object.is_type(Z_PERSISTENT_OBJECT) {
        let value = object.get(Z_PERSISTENT_OBJECT_VALUE)?.as_object()?;
        Some((value, PathBuf::from(Z_PERSISTENT_OBJECT_VALUE)))
    } else {
        Some((object, PathBuf::new()))
    }
}

fn persistent_value_mut(root: &mut Node) -> Option<&mut ZObject> {
    let object = root.as_object_mut()?;
    if object.is_type(Z_PERSISTENT_OBJECT) {
        object.get_mut(Z_PERSISTENT_OBJECT_VALUE)?.as_object_mut()
    } else {
        Some(object)
    }
}
