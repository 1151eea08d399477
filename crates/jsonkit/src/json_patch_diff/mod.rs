//! JSON Patch diff: generate a JSON Patch from two document values.
//!
//! Each container level is handled in two passes. The first walks the target:
//! members present on both sides recurse when they are containers of the same
//! kind and are replaced when they differ otherwise, and members missing from
//! the source are added. The second pass removes source members the target
//! lacks. Array removals run from the highest index down, so every emitted
//! pointer is valid at the moment it is applied.
//!
//! Values are compared exactly, number representation included: `1` and
//! `1.0` differ, so applying the patch reproduces the target as written.

use serde_json::{Map, Value};

use crate::document::same_kind;
use crate::json_patch::types::Op;

// ── Public API ────────────────────────────────────────────────────────────

/// Generate a JSON Patch (list of operations) that transforms `src` into `dst`.
pub fn diff(src: &Value, dst: &Value) -> Vec<Op> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &[], src, dst);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<Op>, path: &[String], src: &Value, dst: &Value) {
    if src == dst {
        return;
    }
    match (src, dst) {
        (Value::Object(s), Value::Object(d)) => diff_obj(ops, path, s, d),
        (Value::Array(s), Value::Array(d)) => diff_arr(ops, path, s, d),
        _ => ops.push(Op::Replace {
            path: path.to_vec(),
            value: dst.clone(),
        }),
    }
}

fn child(path: &[String], step: String) -> Vec<String> {
    let mut p = Vec::with_capacity(path.len() + 1);
    p.extend_from_slice(path);
    p.push(step);
    p
}

fn diff_member(ops: &mut Vec<Op>, path: Vec<String>, src: &Value, dst: &Value) {
    if same_kind(src, dst) {
        diff_at_path(ops, &path, src, dst);
    } else if src != dst {
        ops.push(Op::Replace {
            path,
            value: dst.clone(),
        });
    }
}

fn diff_obj(ops: &mut Vec<Op>, path: &[String], src: &Map<String, Value>, dst: &Map<String, Value>) {
    for (key, dst_val) in dst {
        let p = child(path, key.clone());
        match src.get(key) {
            Some(src_val) => diff_member(ops, p, src_val, dst_val),
            None => ops.push(Op::Add {
                path: p,
                value: dst_val.clone(),
            }),
        }
    }
    for key in src.keys() {
        if !dst.contains_key(key) {
            ops.push(Op::Remove {
                path: child(path, key.clone()),
            });
        }
    }
}

fn diff_arr(ops: &mut Vec<Op>, path: &[String], src: &[Value], dst: &[Value]) {
    for (i, dst_val) in dst.iter().enumerate() {
        let p = child(path, i.to_string());
        match src.get(i) {
            Some(src_val) => diff_member(ops, p, src_val, dst_val),
            None => ops.push(Op::Add {
                path: p,
                value: dst_val.clone(),
            }),
        }
    }
    for i in (dst.len()..src.len()).rev() {
        ops.push(Op::Remove {
            path: child(path, i.to_string()),
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
