use zobject::{
    constants::NS_MAIN,
    convert::to_normal,
    model::Node,
    services::{InMemoryObjects, ObjectSource},
    store::InvalidItems,
    submit::{NormalizeOptions, SubmitOptions, SubmitOutcome, ViolationKind, normalize, submit, validate},
};

use crate::helpers::*;

const ARGUMENTS: &str = "main.Z2K2.Z8K1";

#[tokio::test]
async fn test_empty_argument_is_pruned_not_reported() {
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z6").unwrap();
    let objects = InMemoryObjects::new();

    let outcome = submit(&mut store, &objects, &SubmitOptions::new()).await.unwrap();
    assert!(outcome.is_saved());

    let saved = objects.fetch_object("Z10000").await.unwrap().unwrap();
    let value = saved.as_object().and_then(|o| o.get("Z2K2")).unwrap();
    assert_eq!(
        serde_json::to_string(value).unwrap(),
        r#"{"Z1K1":"Z8","Z8K1":["Z17"],"Z8K2":"Z6","Z8K3":["Z20"],"Z8K4":["Z14"],"Z8K5":"Z10000"}"#
    );
}

#[tokio::test]
async fn test_labelled_untyped_argument_is_reported() {
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z6").unwrap();
    store
        .write(
            "main.Z2K2.Z8K1.1.Z17K3",
            parse(r#"{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"input"}]}"#),
        )
        .unwrap();
    let before = store.snapshot();
    let objects = InMemoryObjects::new();

    let SubmitOutcome::Rejected(report) =
        submit(&mut store, &objects, &SubmitOptions::new()).await.unwrap()
    else {
        panic!("an untyped argument must be rejected");
    };
    assert_eq!(report.len(), 1);
    let violation = &report.violations()[0];
    assert_eq!(violation.kind, ViolationKind::MissingFunctionInputType);
    assert_eq!(violation.location, "main.Z2K2.Z8K1.1");

    assert_eq!(store.snapshot(), before);
    assert!(objects.is_empty().await);
}

#[tokio::test]
async fn test_resubmission_updates_the_same_object() {
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z6").unwrap();
    let objects = InMemoryObjects::new();

    let first = submit(&mut store, &objects, &SubmitOptions::new().summary("create"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    store.context_mut().object_id = first.id.clone();
    store.write("main.Z2K2.Z8K2", "Z40").unwrap();

    let second = submit(&mut store, &objects, &SubmitOptions::new().summary("retype output"))
        .await
        .unwrap()
        .into_result()
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.revision, first.revision + 1);
    assert_eq!(objects.len().await, 1);
}

#[test]
fn test_normalization_is_idempotent() {
    let mut root = to_normal(&parse(
        r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z10001"},"Z2K2":{"Z1K1":"Z8",
            "Z8K1":["Z17",
                {"Z1K1":"Z17","Z17K1":"","Z17K2":"Z10001K1","Z17K3":{"Z1K1":"Z12","Z12K1":["Z11"]}},
                {"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z10001K7","Z17K3":{"Z1K1":"Z12","Z12K1":["Z11",
                    {"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":""},
                    {"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"text"}]}}],
            "Z8K2":"Z6","Z8K3":["Z20","Z10002"],"Z8K4":["Z14"],"Z8K5":"Z10001"},
            "Z2K3":{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"","Z11K2":"orphan"}]},
            "Z2K4":{"Z1K1":"Z32","Z32K1":["Z31",{"Z1K1":"Z31","Z31K1":"Z1002","Z31K2":["Z6",""]}]},
            "Z2K5":{"Z1K1":"Z12","Z12K1":["Z11"]}}"#,
    ));
    let options = NormalizeOptions::new().disconnect(true);

    normalize(&mut root, &mut InvalidItems::new(), &options);
    let once = root.clone();
    normalize(&mut root, &mut InvalidItems::new(), &options);
    assert_eq!(root, once);

    assert_eq!(
        canonical_json(&once),
        concat!(
            r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z10001"},"Z2K2":{"Z1K1":"Z8","#,
            r#""Z8K1":["Z17",{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z10001K1","#,
            r#""Z17K3":{"Z1K1":"Z12","Z12K1":["Z11",{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"text"}]}}],"#,
            r#""Z8K2":"Z6","Z8K3":["Z20"],"Z8K4":["Z14"],"Z8K5":"Z10001"},"#,
            r#""Z2K3":{"Z1K1":"Z12","Z12K1":["Z11"]},"#,
            r#""Z2K4":{"Z1K1":"Z32","Z32K1":["Z31"]},"#,
            r#""Z2K5":{"Z1K1":"Z12","Z12K1":["Z11"]}}"#
        )
    );
    assert!(validate(&once).is_valid());
}

#[test]
fn test_validation_locations_in_a_namespace() {
    let root = to_normal(&parse(
        r#"{"Z1K1":"Z2","Z2K1":{"Z1K1":"Z6","Z6K1":"Z0"},"Z2K2":{"Z1K1":"Z20","Z20K1":"",
            "Z20K2":{"Z1K1":"Z7","Z7K1":""},"Z20K3":{"Z1K1":"Z7","Z7K1":"Z866"}}}"#,
    ));
    let report = validate(&root).under(NS_MAIN);
    let found: Vec<(String, ViolationKind)> = report
        .violations()
        .iter()
        .map(|v| (v.location.clone(), v.kind))
        .collect();
    assert_eq!(
        found,
        [
            ("main.Z2K2.Z20K1".to_string(), ViolationKind::MissingTargetFunction),
            ("main.Z2K2.Z20K2".to_string(), ViolationKind::MissingTesterCall),
        ]
    );
}

fn labelled_argument(label: &str) -> Node {
    parse(&format!(
        r#"{{"Z1K1":"Z17","Z17K1":"Z6","Z17K2":"Z0K1","Z17K3":{{"Z1K1":"Z12",
            "Z12K1":["Z11",{{"Z1K1":"Z11","Z11K1":"Z1002","Z11K2":"{label}"}}]}}}}"#
    ))
}

async fn saved_json(objects: &InMemoryObjects) -> String {
    let saved = objects.fetch_object("Z10000").await.unwrap().unwrap();
    serde_json::to_string(&saved).unwrap()
}

#[tokio::test]
async fn test_flagged_argument_removed_after_earlier_delete() {
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z6").unwrap();
    store
        .append_items(
            ARGUMENTS,
            ["junk", "good", "bad"].map(labelled_argument),
        )
        .unwrap();
    store.mark_invalid_item(ARGUMENTS, 4).unwrap();
    store.delete_items_at(ARGUMENTS, &[2]).unwrap();
    let objects = InMemoryObjects::new();

    let outcome = submit(&mut store, &objects, &SubmitOptions::new()).await.unwrap();
    assert!(outcome.is_saved());
    let saved = saved_json(&objects).await;
    assert!(saved.contains(r#""Z11K2":"good""#));
    assert!(!saved.contains("bad"));
    assert!(!saved.contains("junk"));
}

#[tokio::test]
async fn test_rewritten_arguments_lose_old_flags() {
    let mut store = function_store();
    store.write("main.Z2K2.Z8K2", "Z6").unwrap();
    store.mark_invalid_item(ARGUMENTS, 1).unwrap();
    store.write(ARGUMENTS, parse(r#"["Z17"]"#)).unwrap();
    store.append_items(ARGUMENTS, [labelled_argument("good")]).unwrap();
    let objects = InMemoryObjects::new();

    let outcome = submit(&mut store, &objects, &SubmitOptions::new()).await.unwrap();
    assert!(outcome.is_saved());
    assert!(saved_json(&objects).await.contains(r#""Z11K2":"good""#));
}
