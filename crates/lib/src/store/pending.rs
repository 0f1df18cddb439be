//! Placeholders waiting for fetched schemas.

use tracing::{debug, warn};

use super::Store;
use crate::{
    constants::{Z_FUNCTION_CALL, Z_FUNCTION_CALL_FUNCTION, Z_OBJECT_TYPE},
    factory::{CreateOptions, Factory, Unresolved, UnresolvedKind},
    model::{Node, Path, PathBuf, ZObject, resolve_mut},
    services::FetchEvent,
};

/// A tracked placeholder in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// A shell `{Z1K1: type_id}` waiting for the type's keys
    Shell {
        path: PathBuf,
        type_id: String,
        /// Options the shell was scaffolded with
        options: CreateOptions,
    },
    /// A call to `function` waiting for the function's arguments
    CallArguments { path: PathBuf, function: String },
}

impl Pending {
    pub fn path(&self) -> &Path {
        match self {
            Pending::Shell { path, .. } | Pending::CallArguments { path, .. } => path,
        }
    }

    /// The id whose fetch this placeholder waits for.
    pub fn id(&self) -> &str {
        match self {
            Pending::Shell { type_id, .. } => type_id,
            Pending::CallArguments { function, .. } => function,
        }
    }
}

impl Store {
    /// Placeholders still waiting for a fetch.
    pub fn pending(&self) -> &[Pending] {
        &self.pending
    }

    /// Drains the ids the store wants fetched. Each id is requested once.
    pub fn take_fetch_requests(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    /// Tracks the placeholders of a scaffold written at `base`.
    pub(super) fn track(&mut self, base: &Path, unresolved: Vec<Unresolved>) {
        for Unresolved {
            path,
            id,
            kind,
            options,
        } in unresolved
        {
            let path = base.to_path_buf().join(&path);
            if !self.fetched.contains(&id) && self.requested.insert(id.clone()) {
                self.outbox.push(id.clone());
            }
            self.pending.push(match kind {
                UnresolvedKind::Type => Pending::Shell {
                    path,
                    type_id: id,
                    options,
                },
                UnresolvedKind::Function => Pending::CallArguments { path, function: id },
            });
        }
    }

    /// Forgets placeholders at or below `path`; the caller is replacing them.
    pub(super) fn dismiss_pending(&mut self, path: &Path) {
        self.pending.retain(|pending| !pending.path().starts_with(path));
    }

    /// Applies the outcome of a background fetch.
    ///
    /// A fetched object is cached, then every placeholder waiting for it is
    /// completed, but only if it is still exactly as scaffolded. Placeholders
    /// edited in the meantime are left alone. A failed fetch leaves its
    /// placeholders as they are. Returns the number of placeholders patched.
    pub fn apply_fetch_event(&mut self, event: FetchEvent) -> usize {
        let id = match event {
            FetchEvent::Fetched { id, object } => {
                self.schemas.insert_persisted(&object);
                id
            }
            FetchEvent::Failed { id, error } => {
                warn!(zid = %id, error = %error, "Fetch failed, placeholders stay unresolved");
                id
            }
        };
        self.requested.remove(&id);
        self.fetched.insert(id.clone());

        let (waiting, rest): (Vec<Pending>, Vec<Pending>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|pending| pending.id() == id);
        self.pending = rest;

        let mut patched = 0;
        for pending in waiting {
            match self.patch(&pending) {
                Some(unresolved) => {
                    patched += 1;
                    self.track(pending.path(), unresolved);
                }
                None => debug!(path = %pending.path(), zid = %id, "Placeholder not patched"),
            }
        }
        patched
    }

    /// Completes one placeholder. Returns the new placeholders it produced.
    fn patch(&mut self, pending: &Pending) -> Option<Vec<Unresolved>> {
        let factory = Factory::new(&self.context, &self.schemas, &self.registry);
        let location = resolve_mut(&mut self.document, pending.path()).ok()?;

        match pending {
            Pending::Shell {
                type_id, options, ..
            } => {
                let shell = Node::Object(ZObject::new(Node::reference(type_id.as_str())));
                if location.value() != Some(&shell) {
                    return None;
                }
                self.schemas.type_schema(type_id)?;
                let scaffold = factory.scaffold(type_id.as_str(), options).ok()?;
                location.set(scaffold.node).ok()?;
                Some(scaffold.unresolved)
            }
            Pending::CallArguments { function, .. } => {
                let signature = self.schemas.function_signature(function)?;
                let call = location.into_value_mut()?.as_object_mut()?;
                let untouched = call.is_type(Z_FUNCTION_CALL)
                    && call
                        .get(Z_FUNCTION_CALL_FUNCTION)
                        .and_then(Node::reference_id)
                        == Some(function.as_str())
                    && call
                        .keys()
                        .all(|key| key == Z_OBJECT_TYPE || key == Z_FUNCTION_CALL_FUNCTION);
                if !untouched {
                    return None;
                }

                let mut unresolved = Vec::new();
                for argument in &signature.arguments {
                    let scaffold = factory
                        .scaffold(argument.value_type.clone(), &CreateOptions::new())
                        .ok()?;
                    let key = PathBuf::from(argument.key.as_str());
                    unresolved.extend(scaffold.unresolved.into_iter().map(|mut u| {
                        u.path = key.clone().join(&u.path);
                        u
                    }));
                    call.insert(argument.key.as_str(), scaffold.node);
                }
                Some(unresolved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::EditorContext, constants::NS_MAIN, services::ServiceError};

    fn parse(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    fn tree_type() -> Node {
        parse(
            r#"{"Z1K1":"Z2","Z2K1":"Z10001","Z2K2":{"Z1K1":"Z4","Z4K1":"Z10001","Z4K2":["Z3",
                {"Z1K1":"Z3","Z3K1":"Z6","Z3K2":"Z10001K1"},
                {"Z1K1":"Z3","Z3K1":"Z10002","Z3K2":"Z10001K2"}]}}"#,
        )
    }

    fn echo_function() -> Node {
        parse(
            r#"{"Z1K1":"Z2","Z2K1":"Z801","Z2K2":{"Z1K1":"Z8",
                "Z8K1":["Z17",{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z801K1"}],
                "Z8K2":"Z6","Z8K3":["Z20"],"Z8K4":["Z14"],"Z8K5":"Z801"}}"#,
        )
    }

    #[test]
    fn test_shell_is_patched_on_arrival() {
        let mut store = Store::new(EditorContext::default());
        store.create_root(NS_MAIN, "Z10001", &CreateOptions::new()).unwrap();
        assert_eq!(store.take_fetch_requests(), ["Z10001"]);
        assert!(store.take_fetch_requests().is_empty());

        let patched = store.apply_fetch_event(FetchEvent::Fetched {
            id: "Z10001".into(),
            object: tree_type(),
        });
        assert_eq!(patched, 1);
        assert_eq!(store.read("main.Z10001K1"), Some(&Node::string("")));
        // The nested unknown type becomes a new placeholder
        assert_eq!(store.take_fetch_requests(), ["Z10002"]);
        assert_eq!(store.pending()[0].path().as_str(), "main.Z10001K2");
    }

    #[test]
    fn test_patched_root_keeps_its_options() {
        let enum_type = parse(
            r#"{"Z1K1":"Z2","Z2K1":"Z10010","Z2K2":{"Z1K1":"Z4","Z4K1":"Z10010",
                "Z4K2":["Z3",{"Z1K1":"Z3","Z3K1":"Z10010","Z3K2":"Z10010K1","Z3K4":"Z41"}]}}"#,
        );
        let context = EditorContext::default().with_object_id("Z10010");

        let mut late = Store::new(context.clone());
        late.create_root(NS_MAIN, "Z10010", &CreateOptions::new().root()).unwrap();
        let patched = late.apply_fetch_event(FetchEvent::Fetched {
            id: "Z10010".into(),
            object: enum_type.clone(),
        });
        assert_eq!(patched, 1);

        let mut cached = Store::new(context);
        cached.schemas_mut().insert_persisted(&enum_type);
        cached.create_root(NS_MAIN, "Z10010", &CreateOptions::new().root()).unwrap();

        let expected = parse(r#"{"Z1K1":"Z10010","Z10010K1":"Z10010"}"#);
        assert_eq!(late.canonical(NS_MAIN), Some(expected.clone()));
        assert_eq!(cached.canonical(NS_MAIN), Some(expected));
    }

    #[test]
    fn test_most_recent_edit_wins() {
        let mut store = Store::new(EditorContext::default());
        store.create_root(NS_MAIN, "Z10001", &CreateOptions::new()).unwrap();
        store.retype_field(NS_MAIN, "Z40", &CreateOptions::new()).unwrap();

        let patched = store.apply_fetch_event(FetchEvent::Fetched {
            id: "Z10001".into(),
            object: tree_type(),
        });
        assert_eq!(patched, 0);
        assert_eq!(store.read(NS_MAIN).and_then(Node::type_id), Some("Z40"));
        assert!(store.schemas().type_schema("Z10001").is_some());
    }

    #[test]
    fn test_failed_edit_keeps_placeholders() {
        let mut store = Store::new(EditorContext::default());
        store.load_canonical(NS_MAIN, &parse(r#"{"Z1K1":"Z7","Z7K1":"Z801","Z801K1":["Z1"]}"#));
        store
            .retype_field("main.Z801K1.1", "Z10001", &CreateOptions::new())
            .unwrap();
        store.delete_items_at("main.Z801K1", &[1]).unwrap();
        let before = store.pending().to_vec();
        assert_eq!(before.len(), 1);

        assert!(store.unset("main.Z801K1.1").is_err());
        assert!(store.write("main.Z801K1.1.Z1K1", "Z6").is_err());
        assert_eq!(store.pending(), before.as_slice());
    }

    #[test]
    fn test_failed_fetch_leaves_shell() {
        let mut store = Store::new(EditorContext::default());
        store.create_root(NS_MAIN, "Z10001", &CreateOptions::new()).unwrap();
        let patched = store.apply_fetch_event(FetchEvent::Failed {
            id: "Z10001".into(),
            error: ServiceError::NotFound { id: "Z10001".into() },
        });
        assert_eq!(patched, 0);
        assert_eq!(store.canonical(NS_MAIN), Some(parse(r#"{"Z1K1":"Z10001"}"#)));
        assert!(store.pending().is_empty());

        // Not requested again in this session
        store.retype_field(NS_MAIN, "Z10001", &CreateOptions::new()).unwrap();
        assert!(store.take_fetch_requests().is_empty());
    }

    #[test]
    fn test_call_arguments_filled_on_arrival() {
        let mut store = Store::new(EditorContext::default());
        store.create_root(NS_MAIN, "Z7", &CreateOptions::new()).unwrap();
        store.set_function_call(NS_MAIN, "Z801").unwrap();
        assert_eq!(store.take_fetch_requests(), ["Z801"]);

        let patched = store.apply_fetch_event(FetchEvent::Fetched {
            id: "Z801".into(),
            object: echo_function(),
        });
        assert_eq!(patched, 1);
        assert_eq!(
            store.canonical(NS_MAIN),
            Some(parse(r#"{"Z1K1":"Z7","Z7K1":"Z801","Z801K1":""}"#))
        );

        // Once cached, new calls get their arguments immediately
        store.set_function_call(NS_MAIN, "Z801").unwrap();
        assert!(store.read("main.Z801K1").is_some());
        assert!(store.pending().is_empty());
    }
}
