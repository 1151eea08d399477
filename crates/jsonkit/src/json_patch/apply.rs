//! JSON Patch apply logic.

use jsonkit_json_pointer::{array_index, format_json_pointer, get, get_mut, is_child, remove_mut};
use serde_json::{Map, Value};

use crate::document::deep_equal;

use super::types::{ApplyPatchOptions, Op, OpResult, PatchError, PatchResult};

// ── Path navigation ───────────────────────────────────────────────────────

/// Walk to the container that holds the last step of `path`.
///
/// With `create_missing`, absent object keys along the way become empty objects.
fn parent_mut<'a>(
    doc: &'a mut Value,
    path: &[String],
    create_missing: bool,
) -> Result<&'a mut Value, PatchError> {
    let parents = &path[..path.len().saturating_sub(1)];
    let mut current = doc;
    for step in parents {
        current = match current {
            Value::Object(map) => {
                if create_missing {
                    Some(
                        map.entry(step.clone())
                            .or_insert_with(|| Value::Object(Map::new())),
                    )
                } else {
                    map.get_mut(step)
                }
            }
            Value::Array(arr) => array_index(step).and_then(move |idx| arr.get_mut(idx)),
            _ => None,
        }
        .ok_or_else(|| PatchError::path_not_found(path))?;
    }
    Ok(current)
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(
    doc: &mut Value,
    path: &[String],
    value: Value,
    create_missing: bool,
) -> Result<Option<Value>, PatchError> {
    let Some(key) = path.last() else {
        return Ok(Some(std::mem::replace(doc, value)));
    };
    match parent_mut(doc, path, create_missing)? {
        Value::Object(map) => Ok(map.insert(key.clone(), value)),
        Value::Array(arr) => {
            if key == "-" {
                arr.push(value);
                return Ok(None);
            }
            match array_index(key) {
                Some(idx) if idx <= arr.len() => {
                    arr.insert(idx, value);
                    Ok(None)
                }
                _ => Err(PatchError::path_not_found(path)),
            }
        }
        _ => Err(PatchError::invalid_target(path)),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Value, PatchError> {
    Ok(remove_mut(doc, path)?)
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<Value, PatchError> {
    let target = get_mut(doc, path).ok_or_else(|| PatchError::value_not_found(path))?;
    Ok(std::mem::replace(target, value))
}

fn apply_copy(
    doc: &mut Value,
    path: &[String],
    from: &[String],
    create_missing: bool,
) -> Result<Option<Value>, PatchError> {
    let value = get(doc, from)?.clone();
    apply_add(doc, path, value, create_missing)
}

fn apply_move(
    doc: &mut Value,
    path: &[String],
    from: &[String],
    create_missing: bool,
) -> Result<Option<Value>, PatchError> {
    get(doc, from)?;
    if path == from {
        return Ok(None);
    }
    if is_child(from, path) {
        return Err(PatchError::invalid_target(path));
    }
    let value = apply_remove(doc, from)?;
    match apply_add(doc, path, value.clone(), create_missing) {
        Ok(old) => Ok(old),
        Err(err) => {
            // Put the source back so a failed move never loses the value.
            apply_add(doc, from, value, false)?;
            Err(err)
        }
    }
}

fn apply_test(doc: &Value, path: &[String], value: &Value) -> Result<(), PatchError> {
    let actual = get(doc, path)?;
    if deep_equal(actual, value) {
        Ok(())
    } else {
        Err(PatchError::test_failed(path))
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// Apply a single operation in place.
///
/// Returns the value the operation displaced or removed: the previous value
/// for `replace`, the removed value for `remove`, an overwritten object member
/// for `add`/`copy`/`move`, and `None` otherwise.
pub fn apply_op(
    doc: &mut Value,
    op: &Op,
    options: &ApplyPatchOptions,
) -> Result<Option<Value>, PatchError> {
    tracing::trace!(op = op.op_name(), path = %format_json_pointer(op.path()), "applying patch op");
    match op {
        Op::Add { path, value } => apply_add(doc, path, value.clone(), options.create_missing),
        Op::Remove { path } => apply_remove(doc, path).map(Some),
        Op::Replace { path, value } => apply_replace(doc, path, value.clone()).map(Some),
        Op::Move { path, from } => apply_move(doc, path, from, options.create_missing),
        Op::Copy { path, from } => apply_copy(doc, path, from, options.create_missing),
        Op::Test { path, value } => apply_test(doc, path, value).map(|_| None),
    }
}

/// Apply a patch in place.
///
/// The first failing operation aborts the batch. With `options.atomic` the
/// document is restored to its state before the call; otherwise the
/// operations that already ran stay applied.
pub fn apply_patch_mut(
    doc: &mut Value,
    ops: &[Op],
    options: &ApplyPatchOptions,
) -> Result<(), PatchError> {
    let snapshot = options.atomic.then(|| doc.clone());
    for (index, op) in ops.iter().enumerate() {
        if let Err(err) = apply_op(doc, op, options) {
            match snapshot {
                Some(snapshot) => {
                    *doc = snapshot;
                    tracing::debug!(index, error = %err, "patch failed, document rolled back");
                }
                None => {
                    tracing::debug!(index, error = %err, "patch failed, applied prefix kept");
                }
            }
            return Err(err);
        }
    }
    Ok(())
}

/// Apply a patch to a copy of `doc` and return the copy.
///
/// `doc` is never modified, whether or not the patch succeeds.
pub fn apply_patch(doc: &Value, ops: &[Op]) -> Result<Value, PatchError> {
    let mut out = doc.clone();
    apply_patch_mut(&mut out, ops, &ApplyPatchOptions::compat())?;
    Ok(out)
}

/// Apply a sequence of operations, returning the final document and per-op results.
pub fn apply_ops(mut doc: Value, ops: &[Op]) -> Result<PatchResult, PatchError> {
    let options = ApplyPatchOptions::compat();
    let mut results = Vec::with_capacity(ops.len());
    for op in ops {
        let old = apply_op(&mut doc, op, &options)?;
        results.push(OpResult {
            doc: doc.clone(),
            old,
        });
    }
    Ok(PatchResult { doc, res: results })
}

/// Whether `ops` would apply cleanly to `doc`. Never fails.
pub fn test_patch(doc: &Value, ops: &[Op]) -> bool {
    apply_patch(doc, ops).is_ok()
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use jsonkit_json_pointer::parse_json_pointer;
    use serde_json::json;

    fn path(s: &str) -> Vec<String> {
        parse_json_pointer(s).unwrap()
    }

    fn apply(doc: &mut Value, op: Op) -> Result<Option<Value>, PatchError> {
        apply_op(doc, &op, &ApplyPatchOptions::default())
    }

    #[test]
    fn add_to_object() {
        let mut doc = json!({"a": 1});
        apply(&mut doc, Op::Add { path: path("/b"), value: json!(2) }).unwrap();
        assert_eq!(doc, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn add_inserts_into_array() {
        let mut doc = json!([1, 2, 3]);
        apply(&mut doc, Op::Add { path: path("/1"), value: json!(99) }).unwrap();
        assert_eq!(doc, json!([1, 99, 2, 3]));
        apply(&mut doc, Op::Add { path: path("/4"), value: json!(4) }).unwrap();
        assert_eq!(doc, json!([1, 99, 2, 3, 4]));
        let err = apply(&mut doc, Op::Add { path: path("/9"), value: json!(0) }).unwrap_err();
        assert_eq!(err, PatchError::PathNotFound { pointer: "/9".into() });
    }

    #[test]
    fn add_append_array() {
        let mut doc = json!([1, 2]);
        apply(&mut doc, Op::Add { path: path("/-"), value: json!(3) }).unwrap();
        assert_eq!(doc, json!([1, 2, 3]));
    }

    #[test]
    fn add_creates_missing_parents() {
        let mut doc = json!({});
        apply(&mut doc, Op::Add { path: path("/a/b/c"), value: json!(1) }).unwrap();
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));

        let mut doc = json!({});
        let strict = ApplyPatchOptions {
            create_missing: false,
            ..ApplyPatchOptions::default()
        };
        let op = Op::Add { path: path("/a/b"), value: json!(1) };
        assert!(matches!(
            apply_op(&mut doc, &op, &strict),
            Err(PatchError::PathNotFound { .. })
        ));
    }

    #[test]
    fn add_walks_existing_parents_when_creating() {
        let mut doc = json!({"a": {"items": [{"n": 1}]}});
        apply(&mut doc, Op::Add { path: path("/a/items/0/tags/first"), value: json!("t") }).unwrap();
        assert_eq!(doc, json!({"a": {"items": [{"n": 1, "tags": {"first": "t"}}]}}));
        let err = apply(&mut doc, Op::Add { path: path("/a/items/3/n"), value: json!(0) }).unwrap_err();
        assert!(matches!(err, PatchError::PathNotFound { .. }));
    }

    #[test]
    fn add_into_scalar_is_invalid_target() {
        let mut doc = json!({"a": 1});
        let err = apply(&mut doc, Op::Add { path: path("/a/b"), value: json!(2) }).unwrap_err();
        assert_eq!(err, PatchError::InvalidTarget { pointer: "/a/b".into() });
    }

    #[test]
    fn remove_from_object_and_array() {
        let mut doc = json!({"a": 1, "b": [1, 2, 3]});
        let old = apply(&mut doc, Op::Remove { path: path("/a") }).unwrap();
        assert_eq!(old, Some(json!(1)));
        apply(&mut doc, Op::Remove { path: path("/b/0") }).unwrap();
        assert_eq!(doc, json!({"b": [2, 3]}));
    }

    #[test]
    fn remove_missing_and_root() {
        let mut doc = json!({"a": 1});
        assert_eq!(
            apply(&mut doc, Op::Remove { path: path("/z") }).unwrap_err(),
            PatchError::PathNotFound { pointer: "/z".into() }
        );
        assert!(matches!(
            apply(&mut doc, Op::Remove { path: path("") }),
            Err(PatchError::PathNotFound { .. })
        ));
    }

    #[test]
    fn replace_requires_existing_value() {
        let mut doc = json!({"a": 1});
        let old = apply(&mut doc, Op::Replace { path: path("/a"), value: json!(99) }).unwrap();
        assert_eq!(old, Some(json!(1)));
        assert_eq!(doc, json!({"a": 99}));
        assert_eq!(
            apply(&mut doc, Op::Replace { path: path("/b"), value: json!(1) }).unwrap_err(),
            PatchError::ValueNotFound { pointer: "/b".into() }
        );
        apply(&mut doc, Op::Replace { path: path(""), value: json!([]) }).unwrap();
        assert_eq!(doc, json!([]));
    }

    #[test]
    fn copy_op() {
        let mut doc = json!({"a": {"x": 1}, "b": {}});
        apply(&mut doc, Op::Copy { path: path("/b/x"), from: path("/a/x") }).unwrap();
        assert_eq!(doc, json!({"a": {"x": 1}, "b": {"x": 1}}));
    }

    #[test]
    fn move_op() {
        let mut doc = json!({"a": 1, "b": 2});
        apply(&mut doc, Op::Move { path: path("/c"), from: path("/a") }).unwrap();
        assert_eq!(doc, json!({"b": 2, "c": 1}));

        let mut doc = json!({"list": [1, 2, 3]});
        apply(&mut doc, Op::Move { path: path("/list/0"), from: path("/list/2") }).unwrap();
        assert_eq!(doc, json!({"list": [3, 1, 2]}));
    }

    #[test]
    fn move_errors() {
        let mut doc = json!({"a": {"b": 1}});
        assert_eq!(
            apply(&mut doc, Op::Move { path: path("/a/b/c"), from: path("/a") }).unwrap_err(),
            PatchError::InvalidTarget { pointer: "/a/b/c".into() }
        );
        assert_eq!(
            apply(&mut doc, Op::Move { path: path("/x"), from: path("/nope") }).unwrap_err(),
            PatchError::PathNotFound { pointer: "/nope".into() }
        );
        assert!(apply(&mut doc, Op::Move { path: path("/a/b/x"), from: path("/a/b") }).is_err());
        assert_eq!(doc, json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_pass_and_fail() {
        let mut doc = json!({"a": 42, "f": 1.0});
        apply(&mut doc, Op::Test { path: path("/a"), value: json!(42) }).unwrap();
        apply(&mut doc, Op::Test { path: path("/f"), value: json!(1) }).unwrap();
        assert_eq!(
            apply(&mut doc, Op::Test { path: path("/a"), value: json!("42") }).unwrap_err(),
            PatchError::TestFailed { pointer: "/a".into() }
        );
        assert!(matches!(
            apply(&mut doc, Op::Test { path: path("/z"), value: json!(null) }),
            Err(PatchError::PathNotFound { .. })
        ));
    }

    #[test]
    fn add_then_remove_both_execute() {
        let ops = vec![
            Op::Add { path: path("/x"), value: json!(1) },
            Op::Remove { path: path("/x") },
        ];
        let result = apply_ops(json!({}), &ops).unwrap();
        assert_eq!(result.doc, json!({}));
        assert_eq!(result.res.len(), 2);
        assert_eq!(result.res[0].doc, json!({"x": 1}));
        assert_eq!(result.res[1].old, Some(json!(1)));
    }

    #[test]
    fn atomic_batch_rolls_back() {
        let ops = vec![
            Op::Add { path: path("/x"), value: json!(1) },
            Op::Remove { path: path("/missing") },
        ];
        let mut doc = json!({"a": 1});
        assert!(apply_patch_mut(&mut doc, &ops, &ApplyPatchOptions::default()).is_err());
        assert_eq!(doc, json!({"a": 1}));

        let mut doc = json!({"a": 1});
        assert!(apply_patch_mut(&mut doc, &ops, &ApplyPatchOptions::compat()).is_err());
        assert_eq!(doc, json!({"a": 1, "x": 1}));
    }

    #[test]
    fn copying_apply_leaves_input_alone() {
        let doc = json!({"a": 1});
        let ops = vec![Op::Replace { path: path("/a"), value: json!(2) }];
        assert_eq!(apply_patch(&doc, &ops).unwrap(), json!({"a": 2}));
        assert_eq!(doc, json!({"a": 1}));
        assert!(test_patch(&doc, &ops));
        assert!(!test_patch(&doc, &[Op::Test { path: path("/a"), value: json!(2) }]));
    }
}
