use std::sync::Arc;

use async_trait::async_trait;
use zobject::{
    Store,
    config::EditorContext,
    constants::{NS_CALL, NS_MAIN, NS_RESPONSE},
    factory::CreateOptions,
    model::Node,
    services::{EvaluationService, FetchDispatcher, InMemoryObjects, ObjectSource, ServiceError},
    submit::{SubmitOptions, submit},
};

use crate::helpers::*;

/// Answers every call with the string it was given as `K1`.
struct EchoEvaluator;

#[async_trait]
impl EvaluationService for EchoEvaluator {
    async fn call(&self, call: &Node) -> Result<Node, ServiceError> {
        call.as_object()
            .and_then(|call| call.get("K1"))
            .cloned()
            .ok_or_else(|| ServiceError::Rejected {
                reason: "missing K1".to_string(),
            })
    }
}

#[tokio::test]
async fn test_scaffold_settles_recursive_types() {
    let objects = InMemoryObjects::new();
    objects.insert(tree_type("Z10001")).await.unwrap();
    let (dispatcher, mut events) = FetchDispatcher::new(Arc::new(objects));

    let mut store = Store::new(EditorContext::default());
    store
        .create_root(NS_MAIN, "Z10001", &CreateOptions::new())
        .unwrap();
    let patched = dispatcher.settle(&mut store, &mut events).await;

    assert_eq!(patched, 1);
    assert!(store.pending().is_empty());
    assert_eq!(
        store.canonical(NS_MAIN),
        Some(parse(r#"{"Z1K1":"Z10001","Z10001K1":"","Z10001K2":""}"#))
    );
}

#[tokio::test]
async fn test_missing_types_stay_shells() {
    let (dispatcher, mut events) = FetchDispatcher::new(Arc::new(InMemoryObjects::new()));

    let mut store = Store::new(EditorContext::default());
    store
        .create_root(NS_MAIN, "Z10404", &CreateOptions::new())
        .unwrap();
    assert_eq!(dispatcher.settle(&mut store, &mut events).await, 0);
    assert_eq!(store.canonical(NS_MAIN), Some(parse(r#"{"Z1K1":"Z10404"}"#)));
}

#[tokio::test]
async fn test_submitted_objects_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("objects.json");

    let objects = InMemoryObjects::new();
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z40").unwrap();
    let revision = submit(&mut store, &objects, &SubmitOptions::new().summary("create"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    objects.save_to_file(&path).await.unwrap();

    let reloaded = InMemoryObjects::load_from_file(&path).await.unwrap();
    assert_eq!(reloaded.ids().await, [revision.id.clone()]);
    assert_eq!(reloaded.revision(&revision.id).await, Some(revision.revision));

    // A reloaded object can be edited again
    let saved = reloaded.fetch_object(&revision.id).await.unwrap().unwrap();
    let mut editor = Store::new(EditorContext::default().with_object_id(revision.id.as_str()));
    editor.load_canonical(NS_MAIN, &saved);
    assert_eq!(editor.read("main.Z2K2.Z8K5"), Some(&Node::reference(revision.id.as_str())));
    assert_eq!(editor.canonical(NS_MAIN), Some(saved));
}

#[tokio::test]
async fn test_function_call_response_is_stored() {
    let mut store = Store::new(EditorContext::default());
    store
        .create_root(NS_CALL, "Z7", &CreateOptions::new().value("Z10100"))
        .unwrap();
    store.add_local_argument(NS_CALL, "echo").unwrap();

    let response = store.run_function_call(&EchoEvaluator).await.unwrap();
    assert_eq!(response, Node::string("echo"));
    assert_eq!(store.read(NS_RESPONSE), Some(&Node::string("echo")));

    let mut empty = Store::new(EditorContext::default());
    let err = empty.run_function_call(&EchoEvaluator).await.unwrap_err();
    assert!(err.is_not_found());
}
