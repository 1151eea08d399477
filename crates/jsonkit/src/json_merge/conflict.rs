//! Three-way merge with conflict detection.

use jsonkit_json_pointer::format_json_pointer;
use serde::Serialize;
use serde_json::Value;

use crate::document::{deep_equal, same_kind};

/// A location both sides changed, differently, relative to the base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    /// RFC 6901 pointer of the conflicting location.
    pub path: String,
    pub target_value: Value,
    pub source_value: Value,
    /// `None` when the base has nothing at this location.
    pub base_value: Option<Value>,
}

/// The merged document plus any conflicts recorded on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
    pub result: Value,
    pub conflicts: Vec<Conflict>,
}

impl MergeOutcome {
    pub fn clean(result: Value) -> Self {
        Self {
            result,
            conflicts: Vec::new(),
        }
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Merge `source` into `target` like [`recursive`](super::recursive), recording
/// a [`Conflict`] wherever the two sides hold different leaf values and both
/// differ from `base`.
///
/// Conflicts never abort the merge and the source value always wins. A missing
/// `base` (or a base lacking the location) counts as different from both sides.
pub fn merge_three_way(target: &Value, source: &Value, base: Option<&Value>) -> MergeOutcome {
    let mut walker = ThreeWay {
        path: Vec::new(),
        conflicts: Vec::new(),
    };
    let result = walker.merge(target, source, base);
    MergeOutcome {
        result,
        conflicts: walker.conflicts,
    }
}

struct ThreeWay {
    path: Vec<String>,
    conflicts: Vec<Conflict>,
}

impl ThreeWay {
    fn merge(&mut self, target: &Value, source: &Value, base: Option<&Value>) -> Value {
        match (target, source) {
            (Value::Object(t), Value::Object(s)) => {
                let mut out = t.clone();
                for (key, s_val) in s {
                    let merged = match t.get(key) {
                        Some(t_val) => {
                            let b_val = base.and_then(|b| b.as_object()).and_then(|b| b.get(key));
                            self.path.push(key.clone());
                            let merged = self.member(t_val, s_val, b_val);
                            self.path.pop();
                            merged
                        }
                        None => s_val.clone(),
                    };
                    out.insert(key.clone(), merged);
                }
                Value::Object(out)
            }
            (Value::Array(t), Value::Array(s)) => {
                let mut out = Vec::with_capacity(t.len().max(s.len()));
                for (i, t_val) in t.iter().enumerate() {
                    match s.get(i) {
                        Some(s_val) => {
                            let b_val = base.and_then(|b| b.as_array()).and_then(|b| b.get(i));
                            self.path.push(i.to_string());
                            out.push(self.member(t_val, s_val, b_val));
                            self.path.pop();
                        }
                        None => out.push(t_val.clone()),
                    }
                }
                out.extend(s.iter().skip(t.len()).cloned());
                Value::Array(out)
            }
            _ => self.leaf(target, source, base),
        }
    }

    fn member(&mut self, target: &Value, source: &Value, base: Option<&Value>) -> Value {
        if same_kind(target, source) {
            self.merge(target, source, base)
        } else {
            self.leaf(target, source, base)
        }
    }

    fn leaf(&mut self, target: &Value, source: &Value, base: Option<&Value>) -> Value {
        let differs_from_base = |v: &Value| base.map_or(true, |b| !deep_equal(v, b));
        if !deep_equal(target, source) && differs_from_base(target) && differs_from_base(source) {
            let path = format_json_pointer(&self.path);
            tracing::debug!(path = %path, "merge conflict, source value kept");
            self.conflicts.push(Conflict {
                path,
                target_value: target.clone(),
                source_value: source.clone(),
                base_value: base.cloned(),
            });
        }
        source.clone()
    }
}
