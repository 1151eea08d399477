//! Merge strategies.
//!
//! Every strategy is a pure function of `(target, source)`: inputs are only
//! borrowed and a fresh document is returned. Where a strategy recurses, it
//! only does so into two containers of the same kind. Two objects merge key
//! by key; two arrays merge index by index, with surplus source elements
//! appended.

use serde_json::{Map, Value};

use crate::document::same_kind;

mod conflict;
pub use conflict::{merge_three_way, Conflict, MergeOutcome};

/// Signature shared by every two-way merge strategy.
pub type MergeFn = fn(&Value, &Value) -> Value;

/// `source` wholly replaces `target`.
pub fn replace(_target: &Value, source: &Value) -> Value {
    source.clone()
}

/// Source members overwrite target members one level deep, without recursion.
pub fn shallow(target: &Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => {
            let mut out = t.clone();
            for (key, value) in s {
                out.insert(key.clone(), value.clone());
            }
            Value::Object(out)
        }
        (Value::Array(t), Value::Array(s)) => {
            let mut out = t.clone();
            for (i, value) in s.iter().enumerate() {
                match out.get_mut(i) {
                    Some(slot) => *slot = value.clone(),
                    None => out.push(value.clone()),
                }
            }
            Value::Array(out)
        }
        _ => source.clone(),
    }
}

/// Recurse into matching containers; everywhere else the source wins.
pub fn recursive(target: &Value, source: &Value) -> Value {
    merge_containers(target, source, recursive, |_, s| s.clone())
}

/// Like [`recursive`], but two arrays are concatenated.
pub fn deep(target: &Value, source: &Value) -> Value {
    if let (Value::Array(t), Value::Array(s)) = (target, source) {
        return Value::Array(t.iter().chain(s).cloned().collect());
    }
    merge_containers(target, source, deep, |_, s| s.clone())
}

/// The source only fills gaps: existing target values are never overwritten,
/// but matching containers are still augmented with their missing members.
pub fn distinct(target: &Value, source: &Value) -> Value {
    merge_containers(target, source, distinct, |t, _| t.clone())
}

/// RFC 7396 JSON Merge Patch.
///
/// A `null` member deletes the key; objects merge recursively; anything else,
/// arrays included, replaces the target value.
pub fn merge_patch(target: &Value, patch: &Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch.clone();
    };
    let mut out = match target {
        Value::Object(t) => t.clone(),
        _ => Map::new(),
    };
    for (key, patch_value) in patch_map {
        if patch_value.is_null() {
            out.shift_remove(key);
            continue;
        }
        let merged = merge_patch(out.get(key).unwrap_or(&Value::Null), patch_value);
        out.insert(key.clone(), merged);
    }
    Value::Object(out)
}

/// Two-way form of the conflict-aware merge: the merged document only.
pub fn conflict_aware(target: &Value, source: &Value) -> Value {
    merge_three_way(target, source, None).result
}

/// Shared walk for the recursive strategies.
///
/// Same-kind container pairs recurse through `descend`; any other pair of
/// values present on both sides is settled by `leaf`. Members present on one
/// side only are kept.
fn merge_containers(
    target: &Value,
    source: &Value,
    descend: MergeFn,
    leaf: fn(&Value, &Value) -> Value,
) -> Value {
    let pick = |t: &Value, s: &Value| {
        if same_kind(t, s) {
            descend(t, s)
        } else {
            leaf(t, s)
        }
    };
    match (target, source) {
        (Value::Object(t), Value::Object(s)) => {
            let mut out = t.clone();
            for (key, s_val) in s {
                let merged = match t.get(key) {
                    Some(t_val) => pick(t_val, s_val),
                    None => s_val.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (Value::Array(t), Value::Array(s)) => {
            let mut out: Vec<Value> = t
                .iter()
                .enumerate()
                .map(|(i, t_val)| match s.get(i) {
                    Some(s_val) => pick(t_val, s_val),
                    None => t_val.clone(),
                })
                .collect();
            out.extend(s.iter().skip(t.len()).cloned());
            Value::Array(out)
        }
        _ => leaf(target, source),
    }
}
