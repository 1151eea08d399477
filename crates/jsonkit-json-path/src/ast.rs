//! AST construction helpers.

use crate::types::*;

/// Helper functions for constructing JSONPath AST nodes.
pub struct Ast;

impl Ast {
    /// Create a JSONPath from segments.
    pub fn path(segments: Vec<PathSegment>) -> JSONPath {
        JSONPath::new(segments)
    }

    /// Create a path segment from selectors.
    pub fn segment(selectors: Vec<Selector>, recursive: bool) -> PathSegment {
        PathSegment::new(selectors, recursive)
    }

    pub fn name(name: impl Into<String>) -> Selector {
        Selector::Name(name.into())
    }

    pub fn index(index: isize) -> Selector {
        Selector::Index(index)
    }

    pub fn slice(start: Option<isize>, end: Option<isize>, step: Option<isize>) -> Selector {
        Selector::Slice { start, end, step }
    }

    pub fn wildcard() -> Selector {
        Selector::Wildcard
    }

    pub fn filter(expr: FilterExpression) -> Selector {
        Selector::Filter(expr)
    }

    /// `@.a.b` style path relative to the current node.
    pub fn current_path(names: &[&str]) -> ValueExpression {
        ValueExpression::Path(JSONPath::new(
            names
                .iter()
                .map(|n| PathSegment::new(vec![Selector::Name((*n).to_string())], false))
                .collect(),
        ))
    }

    pub fn comparison(
        operator: ComparisonOperator,
        left: ValueExpression,
        right: ValueExpression,
    ) -> FilterExpression {
        FilterExpression::Comparison {
            operator,
            left,
            right,
        }
    }

    pub fn literal(value: serde_json::Value) -> ValueExpression {
        ValueExpression::Literal(value)
    }
}
