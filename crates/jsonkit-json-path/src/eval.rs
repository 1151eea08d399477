//! JSONPath evaluator.
//!
//! Evaluation is breadth-first over segments: each segment is applied to the
//! whole current match set to produce the next one. Recursive descent visits a
//! node before its descendants, so matches come out in document pre-order.

use crate::filter::FilterComparator;
use crate::types::*;
use serde_json::Value;

type Match<'a> = (&'a Value, Vec<PathComponent>);

/// JSONPath evaluator.
pub struct JsonPathEval;

impl JsonPathEval {
    /// Evaluate a JSONPath against a JSON document.
    ///
    /// Returns references to the matching values in match order; the same
    /// node may appear more than once.
    pub fn eval<'a>(path: &JSONPath, doc: &'a Value) -> Vec<&'a Value> {
        Self::eval_with_paths(path, doc).values
    }

    /// Evaluate and also report the normalized location of each match.
    pub fn eval_with_paths<'a>(path: &JSONPath, doc: &'a Value) -> QueryResult<'a> {
        let matches = Self::eval_from(path, doc, doc);
        let (values, paths) = matches.into_iter().unzip();
        QueryResult { values, paths }
    }

    fn eval_from<'a>(path: &JSONPath, start: &'a Value, root: &'a Value) -> Vec<Match<'a>> {
        let mut current: Vec<Match<'a>> = vec![(start, Vec::new())];

        for segment in &path.segments {
            let mut next = Vec::new();
            for (value, location) in &current {
                let value = *value;
                if segment.recursive {
                    Self::eval_recursive(value, &segment.selectors, location, root, &mut next);
                } else {
                    for selector in &segment.selectors {
                        Self::eval_selector(value, selector, location, root, &mut next);
                    }
                }
            }
            current = next;
        }

        current
    }

    fn eval_recursive<'a>(
        value: &'a Value,
        selectors: &[Selector],
        location: &[PathComponent],
        root: &'a Value,
        out: &mut Vec<Match<'a>>,
    ) {
        for selector in selectors {
            Self::eval_selector(value, selector, location, root, out);
        }

        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_location = Self::extend(location, PathComponent::Key(key.clone()));
                    Self::eval_recursive(child, selectors, &child_location, root, out);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let child_location = Self::extend(location, PathComponent::Index(idx));
                    Self::eval_recursive(child, selectors, &child_location, root, out);
                }
            }
            _ => {}
        }
    }

    fn eval_selector<'a>(
        value: &'a Value,
        selector: &Selector,
        location: &[PathComponent],
        root: &'a Value,
        out: &mut Vec<Match<'a>>,
    ) {
        match selector {
            Selector::Name(name) => {
                if let Some(child) = value.as_object().and_then(|map| map.get(name)) {
                    out.push((child, Self::extend(location, PathComponent::Key(name.clone()))));
                }
            }
            Selector::Index(index) => {
                if let Value::Array(arr) = value {
                    if let Some(idx) = Self::resolve_index(*index, arr.len()) {
                        out.push((&arr[idx], Self::extend(location, PathComponent::Index(idx))));
                    }
                }
            }
            Selector::Wildcard => Self::push_children(value, location, out, |_| true),
            Selector::Slice { start, end, step } => {
                if let Value::Array(arr) = value {
                    for idx in Self::slice_indices(*start, *end, *step, arr.len()) {
                        out.push((&arr[idx], Self::extend(location, PathComponent::Index(idx))));
                    }
                }
            }
            Selector::Filter(expr) => {
                Self::push_children(value, location, out, |child| {
                    Self::eval_filter(expr, child, root)
                });
            }
        }
    }

    fn push_children<'a>(
        value: &'a Value,
        location: &[PathComponent],
        out: &mut Vec<Match<'a>>,
        mut keep: impl FnMut(&'a Value) -> bool,
    ) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    if keep(child) {
                        out.push((child, Self::extend(location, PathComponent::Key(key.clone()))));
                    }
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    if keep(child) {
                        out.push((child, Self::extend(location, PathComponent::Index(idx))));
                    }
                }
            }
            _ => {}
        }
    }

    fn extend(location: &[PathComponent], component: PathComponent) -> Vec<PathComponent> {
        let mut next = Vec::with_capacity(location.len() + 1);
        next.extend_from_slice(location);
        next.push(component);
        next
    }

    /// Negative indices count from the end; out of range yields `None`.
    fn resolve_index(index: isize, len: usize) -> Option<usize> {
        let len = len as isize;
        let idx = if index < 0 { len.saturating_add(index) } else { index };
        (0..len).contains(&idx).then_some(idx as usize)
    }

    /// Indices selected by `[start:end:step]` over an array of `len` items.
    ///
    /// Bounds are clamped to the array; a zero step selects nothing and a
    /// negative step walks backwards from `start`.
    pub(crate) fn slice_indices(
        start: Option<isize>,
        end: Option<isize>,
        step: Option<isize>,
        len: usize,
    ) -> Vec<usize> {
        let len = len as isize;
        let step = step.unwrap_or(1);
        let normalize = |i: isize| if i >= 0 { i } else { len.saturating_add(i) };

        if step > 0 {
            let lower = start.map(normalize).unwrap_or(0).clamp(0, len);
            let upper = end.map(normalize).unwrap_or(len).clamp(0, len);
            (lower..upper)
                .step_by(step.unsigned_abs())
                .map(|i| i as usize)
                .collect()
        } else if step < 0 {
            let upper = start.map(normalize).unwrap_or(len - 1).clamp(-1, len - 1);
            let lower = end.map(normalize).unwrap_or(-len - 1).clamp(-1, len - 1);
            (lower + 1..=upper)
                .rev()
                .step_by(step.unsigned_abs())
                .map(|i| i as usize)
                .collect()
        } else {
            Vec::new()
        }
    }

    fn eval_filter(expr: &FilterExpression, current: &Value, root: &Value) -> bool {
        match expr {
            FilterExpression::Existence { path, rooted } => {
                let base = if *rooted { root } else { current };
                !Self::eval_from(path, base, root).is_empty()
            }
            FilterExpression::Comparison {
                operator,
                left,
                right,
            } => {
                let left = Self::eval_value_expr(left, current, root);
                let right = Self::eval_value_expr(right, current, root);
                FilterComparator::compare(*operator, left, right)
            }
            FilterExpression::Logical {
                operator,
                left,
                right,
            } => match operator {
                LogicalOperator::And => {
                    Self::eval_filter(left, current, root) && Self::eval_filter(right, current, root)
                }
                LogicalOperator::Or => {
                    Self::eval_filter(left, current, root) || Self::eval_filter(right, current, root)
                }
            },
            FilterExpression::Negation(expr) => !Self::eval_filter(expr, current, root),
            FilterExpression::Paren(expr) => Self::eval_filter(expr, current, root),
        }
    }

    /// Resolve a filter operand; a path operand takes its first match.
    fn eval_value_expr<'v>(
        expr: &'v ValueExpression,
        current: &'v Value,
        root: &'v Value,
    ) -> Option<&'v Value> {
        match expr {
            ValueExpression::Current => Some(current),
            ValueExpression::Root => Some(root),
            ValueExpression::Literal(v) => Some(v),
            ValueExpression::Path(path) => Self::first_match(path, current, root),
            ValueExpression::RootPath(path) => Self::first_match(path, root, root),
        }
    }

    fn first_match<'v>(path: &JSONPath, base: &'v Value, root: &'v Value) -> Option<&'v Value> {
        Self::eval_from(path, base, root)
            .into_iter()
            .next()
            .map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonPathParser;
    use serde_json::json;

    fn eval(expr: &str, doc: &Value) -> Vec<Value> {
        let path = JsonPathParser::parse(expr).unwrap();
        JsonPathEval::eval(&path, doc).into_iter().cloned().collect()
    }

    #[test]
    fn test_name_and_index() {
        let doc = json!({"a": {"b": [10, 20, 30]}});
        assert_eq!(eval("$.a.b[1]", &doc), vec![json!(20)]);
        assert_eq!(eval("$.a.b[-1]", &doc), vec![json!(30)]);
        assert!(eval("$.a.b[-4]", &doc).is_empty());
        assert!(eval("$.a.b[3]", &doc).is_empty());
        assert!(eval("$.a.missing", &doc).is_empty());
        assert!(eval("$.a.b.c", &doc).is_empty());
    }

    #[test]
    fn test_slice_indices() {
        assert_eq!(JsonPathEval::slice_indices(Some(1), Some(3), None, 5), vec![1, 2]);
        assert_eq!(JsonPathEval::slice_indices(None, None, Some(2), 5), vec![0, 2, 4]);
        assert_eq!(JsonPathEval::slice_indices(Some(-2), None, None, 5), vec![3, 4]);
        assert_eq!(
            JsonPathEval::slice_indices(None, None, Some(-1), 4),
            vec![3, 2, 1, 0]
        );
        assert_eq!(JsonPathEval::slice_indices(Some(3), Some(0), Some(-2), 5), vec![3, 1]);
        assert!(JsonPathEval::slice_indices(None, None, Some(0), 5).is_empty());
        assert!(JsonPathEval::slice_indices(Some(10), Some(20), None, 5).is_empty());
        assert_eq!(JsonPathEval::slice_indices(Some(-10), Some(2), None, 5), vec![0, 1]);
    }

    #[test]
    fn test_slice_extreme_steps_and_bounds() {
        assert_eq!(JsonPathEval::slice_indices(Some(1), None, Some(isize::MAX), 3), vec![1]);
        assert_eq!(JsonPathEval::slice_indices(None, None, Some(isize::MIN), 3), vec![2]);
        assert_eq!(
            JsonPathEval::slice_indices(Some(isize::MIN), Some(isize::MAX), None, 3),
            vec![0, 1, 2]
        );
        assert_eq!(
            JsonPathEval::slice_indices(Some(isize::MAX), Some(isize::MIN), Some(-1), 3),
            vec![2, 1, 0]
        );
        assert!(JsonPathEval::slice_indices(None, None, Some(-1), 0).is_empty());

        let doc = json!([0, 1, 2]);
        assert_eq!(eval("$[1::9223372036854775807]", &doc), vec![json!(1)]);
        assert_eq!(eval("$[::-9223372036854775808]", &doc), vec![json!(2)]);
        assert!(eval("$[-9223372036854775808]", &doc).is_empty());
    }

    #[test]
    fn test_wildcard_preserves_key_order() {
        let doc = json!({"z": 1, "a": 2, "m": 3});
        assert_eq!(eval("$.*", &doc), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_recursive_descent_is_pre_order() {
        let doc = json!({"a": {"a": {"a": 1}}, "b": {"a": 2}});
        assert_eq!(
            eval("$..a", &doc),
            vec![json!({"a": {"a": 1}}), json!({"a": 1}), json!(1), json!(2)]
        );
    }

    #[test]
    fn test_filter_with_root_reference() {
        let doc = json!({"limit": 10, "items": [{"v": 5}, {"v": 15}, {"v": 10}]});
        assert_eq!(
            eval("$.items[?(@.v <= $.limit)]", &doc),
            vec![json!({"v": 5}), json!({"v": 10})]
        );
        assert_eq!(eval("$.items[?$.nope]", &doc), Vec::<Value>::new());
        assert_eq!(eval("$.items[?$.limit].v", &doc).len(), 3);
    }

    #[test]
    fn test_filter_over_object_members() {
        let doc = json!({"x": {"on": true}, "y": {"on": false}, "z": {}});
        assert_eq!(eval("$[?(@.on == true)]", &doc), vec![json!({"on": true})]);
        assert_eq!(eval("$[?(@.on)]", &doc).len(), 2);
        assert_eq!(eval("$[?(!@.on)]", &doc), vec![json!({})]);
    }

    #[test]
    fn test_paths_are_reported() {
        let doc = json!({"a": [{"b": 1}, {"b": 2}]});
        let path = JsonPathParser::parse("$.a[*].b").unwrap();
        let result = JsonPathEval::eval_with_paths(&path, &doc);
        assert_eq!(result.pointers(), vec!["/a/0/b", "/a/1/b"]);
        assert_eq!(result.values, vec![&json!(1), &json!(2)]);
    }
}
