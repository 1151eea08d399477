//! JSON codec for JSON Patch operations.
//!
//! Converts operations to and from the RFC 6902 wire format.

use jsonkit_json_pointer::{format_json_pointer, parse_json_pointer};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::json_patch::types::{Op, Path, PatchError};

// ── Path helpers ──────────────────────────────────────────────────────────

fn encode_path(path: &[String]) -> Value {
    Value::String(format_json_pointer(path))
}

fn decode_path(map: &Map<String, Value>, field: &str) -> Result<Option<Path>, PatchError> {
    match map.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(parse_json_pointer(s)?)),
        Some(_) => Err(PatchError::InvalidOp(format!("{field} must be a string"))),
    }
}

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an `Op` to its RFC 6902 object form.
pub fn to_json(op: &Op) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), Value::String(op.op_name().into()));
    m.insert("path".into(), encode_path(op.path()));
    match op {
        Op::Add { value, .. } | Op::Replace { value, .. } | Op::Test { value, .. } => {
            m.insert("value".into(), value.clone());
        }
        Op::Move { from, .. } | Op::Copy { from, .. } => {
            m.insert("from".into(), encode_path(from));
        }
        Op::Remove { .. } => {}
    }
    Value::Object(m)
}

/// Serialize a list of operations to a JSON Patch document.
pub fn to_json_patch(ops: &[Op]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

impl Serialize for Op {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).serialize(serializer)
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize a single operation.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let map = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOp("operation must be an object".into()))?;

    let op = match map.get("op") {
        Some(Value::String(op)) => op.as_str(),
        Some(other) => {
            return Err(PatchError::UnknownOperation {
                op: other.to_string(),
            })
        }
        None => return Err(PatchError::UnknownOperation { op: String::new() }),
    };
    if !matches!(op, "add" | "remove" | "replace" | "move" | "copy" | "test") {
        return Err(PatchError::UnknownOperation { op: op.to_string() });
    }

    let path = decode_path(map, "path")?
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires \"path\"")))?;
    let value = || {
        map.get("value")
            .cloned()
            .ok_or_else(|| PatchError::InvalidOp(format!("{op} requires \"value\"")))
    };
    let from = || {
        decode_path(map, "from")?.ok_or_else(|| PatchError::MissingFromPath { op: op.to_string() })
    };

    Ok(match op {
        "add" => Op::Add {
            path,
            value: value()?,
        },
        "remove" => Op::Remove { path },
        "replace" => Op::Replace {
            path,
            value: value()?,
        },
        "move" => Op::Move {
            path,
            from: from()?,
        },
        "copy" => Op::Copy {
            path,
            from: from()?,
        },
        _ => Op::Test {
            path,
            value: value()?,
        },
    })
}

/// Deserialize a JSON Patch document.
pub fn from_json_patch(v: &Value) -> Result<Vec<Op>, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOp("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_every_op() {
        let patch = json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "remove", "path": "/a"},
            {"op": "replace", "path": "", "value": {}},
            {"op": "move", "path": "/b", "from": "/c~1d"},
            {"op": "copy", "path": "/e/-", "from": "/b"},
            {"op": "test", "path": "/e/0", "value": null}
        ]);
        let ops = from_json_patch(&patch).unwrap();
        assert_eq!(ops.len(), 6);
        assert_eq!(
            ops[3],
            Op::Move {
                path: vec!["b".into()],
                from: vec!["c/d".into()],
            }
        );
        assert_eq!(ops[5], Op::Test { path: vec!["e".into(), "0".into()], value: Value::Null });
        assert_eq!(to_json_patch(&ops), patch);
    }

    #[test]
    fn decode_errors() {
        let cases = [
            (json!({"op": "frobnicate", "path": "/a"}), PatchError::UnknownOperation { op: "frobnicate".into() }),
            (json!({"path": "/a"}), PatchError::UnknownOperation { op: String::new() }),
            (json!({"op": "move", "path": "/a"}), PatchError::MissingFromPath { op: "move".into() }),
            (json!({"op": "copy", "path": "/a"}), PatchError::MissingFromPath { op: "copy".into() }),
            (json!({"op": "remove", "path": "a"}), PatchError::MalformedPointer { pointer: "a".into() }),
            (json!({"op": "move", "path": "/a", "from": "/~2"}), PatchError::MalformedPointer { pointer: "/~2".into() }),
        ];
        for (input, expected) in cases {
            assert_eq!(from_json(&input).unwrap_err(), expected, "{input}");
        }
        assert!(matches!(from_json(&json!({"op": "add", "path": "/a"})), Err(PatchError::InvalidOp(_))));
        assert!(matches!(from_json(&json!({"op": "remove"})), Err(PatchError::InvalidOp(_))));
        assert!(matches!(from_json(&json!([])), Err(PatchError::InvalidOp(_))));
        assert!(matches!(from_json_patch(&json!({})), Err(PatchError::InvalidOp(_))));
    }

    #[test]
    fn serde_serialize_matches_wire_form() {
        let op = Op::Copy { path: vec!["x".into()], from: vec!["a~b".into()] };
        let text = serde_json::to_string(&op).unwrap();
        assert_eq!(text, r#"{"op":"copy","path":"/x","from":"/a~0b"}"#);
    }
}
