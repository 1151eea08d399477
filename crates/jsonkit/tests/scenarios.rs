use jsonkit::json_merge::{merge_patch, merge_three_way};
use jsonkit::json_patch::{
    apply_ops, apply_patch, apply_patch_mut, from_json_patch, ApplyPatchOptions, PatchError,
};
use jsonkit::jsonkit_json_path::query;
use jsonkit::jsonkit_json_pointer::{get, parse_json_pointer, set, SetOptions};
use jsonkit::strategy::{self, DiffStrategy, MergeStrategy};
use serde_json::json;

fn ptr(s: &str) -> Vec<String> {
    parse_json_pointer(s).unwrap()
}

#[test]
fn pointer_get_and_set() {
    let doc = json!({"a": {"b": 1}});
    assert_eq!(get(&doc, &ptr("/a/b")).unwrap(), &json!(1));
    let out = set(&doc, &ptr("/a/c"), json!(2), &SetOptions::default()).unwrap();
    assert_eq!(out, json!({"a": {"b": 1, "c": 2}}));
    assert_eq!(doc, json!({"a": {"b": 1}}));
}

#[test]
fn add_then_remove_runs_both_ops() {
    let ops = from_json_patch(&json!([
        {"op": "add", "path": "/x", "value": 1},
        {"op": "remove", "path": "/x"}
    ]))
    .unwrap();
    assert_eq!(apply_patch(&json!({}), &ops).unwrap(), json!({}));

    let result = apply_ops(json!({}), &ops).unwrap();
    assert_eq!(result.res.len(), 2);
    assert_eq!(result.res[0].doc, json!({"x": 1}));
    assert_eq!(result.res[1].old, Some(json!(1)));
    assert_eq!(result.doc, json!({}));
}

#[test]
fn merge_patch_deletes_and_adds() {
    let target = json!({"name": "A", "age": 1});
    let source = json!({"age": null, "city": "X"});
    assert_eq!(merge_patch(&target, &source), json!({"name": "A", "city": "X"}));
    assert_eq!(
        strategy::merge(MergeStrategy::MergePatch, &target, &source).result,
        json!({"name": "A", "city": "X"})
    );
}

#[test]
fn filter_keeps_cheap_products_in_order() {
    let doc = json!({
        "store": {
            "products": [
                {"name": "w", "price": 999},
                {"name": "x", "price": 599},
                {"name": "y", "price": 399},
                {"name": "z", "price": 299}
            ]
        }
    });
    let hits = query(&doc, "$.store.products[?(@.price < 500)]").unwrap();
    assert_eq!(
        hits,
        vec![&json!({"name": "y", "price": 399}), &json!({"name": "z", "price": 299})]
    );
}

#[test]
fn failed_batch_rolls_back_unless_compat() {
    let ops = from_json_patch(&json!([
        {"op": "add", "path": "/a", "value": 1},
        {"op": "test", "path": "/a", "value": 2}
    ]))
    .unwrap();

    let mut doc = json!({"keep": true});
    let err = apply_patch_mut(&mut doc, &ops, &ApplyPatchOptions::default()).unwrap_err();
    assert!(matches!(err, PatchError::TestFailed { .. }));
    assert_eq!(doc, json!({"keep": true}));

    let mut doc = json!({"keep": true});
    apply_patch_mut(&mut doc, &ops, &ApplyPatchOptions::compat()).unwrap_err();
    assert_eq!(doc, json!({"keep": true, "a": 1}));
}

#[test]
fn diff_reports_agree_with_patch() {
    let source = json!({"users": [{"id": 1, "role": "dev"}], "v": 1});
    let target = json!({"users": [{"id": 1, "role": "lead"}, {"id": 2}], "v": 1});

    let strategy::DiffReport::Rfc6902(ops) = strategy::diff(DiffStrategy::Rfc6902, &source, &target)
    else {
        panic!("expected a patch report");
    };
    assert_eq!(apply_patch(&source, &ops).unwrap(), target);

    let strategy::DiffReport::Summary(summary) = strategy::diff(DiffStrategy::Summary, &source, &target)
    else {
        panic!("expected a summary report");
    };
    assert_eq!((summary.added, summary.removed, summary.modified), (0, 0, 1));
    assert!(!summary.equal);
}

#[test]
fn three_way_merge_records_divergent_edits() {
    let base = json!({"title": "t", "tags": ["a"], "owner": "o"});
    let ours = json!({"title": "ours", "tags": ["a"], "owner": "o2"});
    let theirs = json!({"title": "theirs", "tags": ["a", "b"], "owner": "o"});
    let outcome = merge_three_way(&ours, &theirs, Some(&base));
    assert_eq!(outcome.conflicts.len(), 1);
    assert_eq!(outcome.conflicts[0].path, "/title");
    assert_eq!(outcome.result["title"], json!("theirs"));
    assert_eq!(outcome.result["tags"], json!(["a", "b"]));
}
