//! Diff reports.
//!
//! Every report is computed from `(source, target)` and describes how to get
//! from the source to the target.

use jsonkit_json_pointer::format_json_pointer;
use serde::Serialize;
use serde_json::Value;
use similar::TextDiff;

use crate::document::deep_equal;
use crate::json_patch::Op;
use crate::json_patch_diff;

/// Top-level membership changes.
///
/// Entries are RFC 6901 pointers one level below the root: object keys for
/// objects, indices for arrays. When the two documents are not containers of
/// the same kind, the root pointer `""` is reported as modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuralDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<String>,
}

impl StructuralDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedDiff {
    pub structural: StructuralDiff,
    pub patches: Vec<Op>,
    pub equal: bool,
    /// Character-level similarity of the compact JSON texts, in `0.0..=1.0`.
    pub similarity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub equal: bool,
}

/// One level of membership changes between `source` and `target`.
pub fn structural(source: &Value, target: &Value) -> StructuralDiff {
    let key = |k: &str| format_json_pointer(&[k.to_string()]);
    let mut out = StructuralDiff::default();
    match (source, target) {
        (Value::Object(s), Value::Object(t)) => {
            for (k, t_val) in t {
                match s.get(k) {
                    None => out.added.push(key(k)),
                    Some(s_val) if !deep_equal(s_val, t_val) => out.modified.push(key(k)),
                    Some(_) => {}
                }
            }
            out.removed = s.keys().filter(|k| !t.contains_key(*k)).map(|k| key(k)).collect();
        }
        (Value::Array(s), Value::Array(t)) => {
            for (i, t_val) in t.iter().enumerate() {
                match s.get(i) {
                    None => out.added.push(key(&i.to_string())),
                    Some(s_val) if !deep_equal(s_val, t_val) => {
                        out.modified.push(key(&i.to_string()))
                    }
                    Some(_) => {}
                }
            }
            out.removed = (t.len()..s.len()).map(|i| key(&i.to_string())).collect();
        }
        _ => {
            if !deep_equal(source, target) {
                out.modified.push(String::new());
            }
        }
    }
    out
}

/// RFC 6902 patch from `source` to `target`.
pub fn rfc6902(source: &Value, target: &Value) -> Vec<Op> {
    json_patch_diff::diff(source, target)
}

/// Structural report, patch, equality and textual similarity together.
pub fn detailed(source: &Value, target: &Value) -> DetailedDiff {
    DetailedDiff {
        structural: structural(source, target),
        patches: rfc6902(source, target),
        equal: deep_equal(source, target),
        similarity: similarity(source, target),
    }
}

/// Counts from [`structural`] plus overall equality.
pub fn summary(source: &Value, target: &Value) -> DiffSummary {
    let s = structural(source, target);
    DiffSummary {
        added: s.added.len(),
        removed: s.removed.len(),
        modified: s.modified.len(),
        equal: deep_equal(source, target),
    }
}

/// Ratio of matching characters between the compact serializations.
///
/// A surface heuristic: reordered keys lower it even though the documents
/// are equal.
pub fn similarity(source: &Value, target: &Value) -> f32 {
    let a = source.to_string();
    let b = target.to_string();
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structural_objects() {
        let report = structural(
            &json!({"a": 1, "b": 2, "c/d": 3}),
            &json!({"a": 1, "b": 5, "e": 6}),
        );
        assert_eq!(report.added, vec!["/e"]);
        assert_eq!(report.removed, vec!["/c~1d"]);
        assert_eq!(report.modified, vec!["/b"]);
    }

    #[test]
    fn structural_is_one_level_only() {
        let report = structural(&json!({"a": {"x": 1}}), &json!({"a": {"x": 2, "y": 3}}));
        assert_eq!(report.modified, vec!["/a"]);
        assert!(report.added.is_empty());
    }

    #[test]
    fn structural_arrays_and_scalars() {
        let report = structural(&json!([1, 2, 3]), &json!([1, 9]));
        assert_eq!(report.modified, vec!["/1"]);
        assert_eq!(report.removed, vec!["/2"]);

        assert_eq!(structural(&json!(1), &json!("1")).modified, vec![""]);
        assert!(structural(&json!(1), &json!(1.0)).is_empty());
    }

    #[test]
    fn summary_counts() {
        let s = summary(&json!({"a": 1, "b": 2}), &json!({"b": 3, "c": 4}));
        assert_eq!(
            s,
            DiffSummary {
                added: 1,
                removed: 1,
                modified: 1,
                equal: false
            }
        );
        assert!(summary(&json!([]), &json!([])).equal);
    }

    #[test]
    fn detailed_bundles_everything() {
        let source = json!({"name": "alpha"});
        let target = json!({"name": "alpha", "v": 2});
        let report = detailed(&source, &target);
        assert!(!report.equal);
        assert_eq!(report.patches.len(), 1);
        assert_eq!(report.structural.added, vec!["/v"]);
        assert!(report.similarity > 0.5 && report.similarity < 1.0);

        let same = detailed(&source, &source);
        assert!(same.equal);
        assert_eq!(same.similarity, 1.0);
    }
}
