//! JSONPath utility helpers.

use crate::types::{FilterExpression, JSONPath, LogicalOperator, PathSegment, Selector, ValueExpression};

/// Canonical text form of a JSONPath AST.
///
/// The output parses back to an equal AST.
pub fn json_path_to_string(path: &JSONPath) -> String {
    let mut out = String::from("$");
    write_segments(&mut out, &path.segments);
    out
}

/// Return property names explicitly referenced by name selectors.
///
/// Names used inside filter expressions are included, in the order they appear.
pub fn get_accessed_properties(path: &JSONPath) -> Vec<String> {
    let mut properties = Vec::new();
    collect_path_properties(path, &mut properties);
    properties
}

fn collect_path_properties(path: &JSONPath, out: &mut Vec<String>) {
    for segment in &path.segments {
        for selector in &segment.selectors {
            match selector {
                Selector::Name(name) => out.push(name.clone()),
                Selector::Filter(expr) => collect_filter_properties(expr, out),
                _ => {}
            }
        }
    }
}

fn collect_filter_properties(expr: &FilterExpression, out: &mut Vec<String>) {
    match expr {
        FilterExpression::Comparison { left, right, .. } => {
            for operand in [left, right] {
                if let ValueExpression::Path(path) | ValueExpression::RootPath(path) = operand {
                    collect_path_properties(path, out);
                }
            }
        }
        FilterExpression::Logical { left, right, .. } => {
            collect_filter_properties(left, out);
            collect_filter_properties(right, out);
        }
        FilterExpression::Existence { path, .. } => collect_path_properties(path, out),
        FilterExpression::Paren(inner) | FilterExpression::Negation(inner) => {
            collect_filter_properties(inner, out)
        }
    }
}

fn write_segments(out: &mut String, segments: &[PathSegment]) {
    for segment in segments {
        if segment.recursive {
            out.push_str("..");
        }
        match segment.selectors.as_slice() {
            [Selector::Name(name)] if is_identifier(name) => {
                if !segment.recursive {
                    out.push('.');
                }
                out.push_str(name);
            }
            [Selector::Wildcard] => {
                if !segment.recursive {
                    out.push('.');
                }
                out.push('*');
            }
            selectors => {
                out.push('[');
                for (i, selector) in selectors.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_selector(out, selector);
                }
                out.push(']');
            }
        }
    }
}

fn write_selector(out: &mut String, selector: &Selector) {
    match selector {
        Selector::Name(name) => {
            out.push('\'');
            out.push_str(&escape_single_quoted(name));
            out.push('\'');
        }
        Selector::Index(index) => out.push_str(&index.to_string()),
        Selector::Slice { start, end, step } => {
            if let Some(v) = start {
                out.push_str(&v.to_string());
            }
            out.push(':');
            if let Some(v) = end {
                out.push_str(&v.to_string());
            }
            if let Some(v) = step {
                out.push(':');
                out.push_str(&v.to_string());
            }
        }
        Selector::Wildcard => out.push('*'),
        Selector::Filter(expr) => {
            out.push('?');
            write_filter(out, expr);
        }
    }
}

fn write_filter(out: &mut String, expr: &FilterExpression) {
    match expr {
        FilterExpression::Comparison {
            operator,
            left,
            right,
        } => {
            write_value(out, left);
            out.push(' ');
            out.push_str(operator.as_str());
            out.push(' ');
            write_value(out, right);
        }
        FilterExpression::Logical {
            operator,
            left,
            right,
        } => {
            write_filter(out, left);
            out.push_str(match operator {
                LogicalOperator::And => " && ",
                LogicalOperator::Or => " || ",
            });
            write_filter(out, right);
        }
        FilterExpression::Existence { path, rooted } => {
            out.push(if *rooted { '$' } else { '@' });
            write_segments(out, &path.segments);
        }
        FilterExpression::Paren(inner) => {
            out.push('(');
            write_filter(out, inner);
            out.push(')');
        }
        FilterExpression::Negation(inner) => {
            out.push('!');
            write_filter(out, inner);
        }
    }
}

fn write_value(out: &mut String, value: &ValueExpression) {
    match value {
        ValueExpression::Current => out.push('@'),
        ValueExpression::Root => out.push('$'),
        ValueExpression::Literal(literal) => out.push_str(&literal.to_string()),
        ValueExpression::Path(path) => {
            out.push('@');
            write_segments(out, &path.segments);
        }
        ValueExpression::RootPath(path) => {
            out.push('$');
            write_segments(out, &path.segments);
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn escape_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out
}
