//! Typed comparator for filter expressions.
//!
//! Filter equality is loose: a number and a numeric string compare by value,
//! so `[?(@.qty == 3)]` matches both `{"qty": 3}` and `{"qty": "3"}`. Ordering
//! operators only ever hold between two numbers. Every other pairing of types
//! is unequal and unordered.

use crate::types::ComparisonOperator;
use serde_json::Value;
use std::cmp::Ordering;

/// Coercing comparator used by filter selectors.
pub struct FilterComparator;

impl FilterComparator {
    /// Compare two resolved operands.
    ///
    /// `None` stands for a missing property: such items never match, whatever
    /// the operator.
    pub fn compare(
        operator: ComparisonOperator,
        left: Option<&Value>,
        right: Option<&Value>,
    ) -> bool {
        let (Some(left), Some(right)) = (left, right) else {
            return false;
        };
        match operator {
            ComparisonOperator::Equal => Self::loose_equal(left, right),
            ComparisonOperator::NotEqual => !Self::loose_equal(left, right),
            ComparisonOperator::Less => Self::order(left, right) == Some(Ordering::Less),
            ComparisonOperator::LessEqual => matches!(
                Self::order(left, right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            ComparisonOperator::Greater => Self::order(left, right) == Some(Ordering::Greater),
            ComparisonOperator::GreaterEqual => matches!(
                Self::order(left, right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }

    /// `==` semantics.
    pub fn loose_equal(left: &Value, right: &Value) -> bool {
        match (left, right) {
            (Value::Number(_), Value::Number(_)) => Self::order(left, right) == Some(Ordering::Equal),
            (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
                match (Self::numeric_string(s), n.as_f64()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }

    /// Numeric ordering; `None` unless both sides are numbers.
    pub fn order(left: &Value, right: &Value) -> Option<Ordering> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                    return Some(a.cmp(&b));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            _ => None,
        }
    }

    fn numeric_string(s: &str) -> Option<f64> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
    }
}
