//! JSONPath query engine.
//!
//! Supports the commonly used subset of [RFC 9535](https://www.rfc-editor.org/rfc/rfc9535.html):
//! child names, indices, unions, wildcards, recursive descent, slices and
//! filters with a loose, documented comparison table (see [`FilterComparator`]).
//!
//! # Example
//!
//! ```
//! use jsonkit_json_path::query;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "store": {
//!         "books": [
//!             {"author": "Nigel Rees", "price": 8.95},
//!             {"author": "Evelyn Waugh", "price": 12.99}
//!         ]
//!     }
//! });
//!
//! let authors = query(&doc, "$.store.books[?(@.price < 10)].author").unwrap();
//! assert_eq!(authors, vec![&json!("Nigel Rees")]);
//! ```

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

mod types;
pub use types::*;

mod ast;
pub use ast::Ast;

mod parser;
pub use parser::{JsonPathParser, ParseError};

mod eval;
pub use eval::JsonPathEval;

mod filter;
pub use filter::FilterComparator;

mod cache;
pub use cache::{QueryCache, DEFAULT_CACHE_CAPACITY};

mod util;
pub use util::{get_accessed_properties, json_path_to_string};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JsonPathError {
    #[error("MALFORMED_QUERY: {expression:?}: {source}")]
    MalformedQuery {
        expression: String,
        #[source]
        source: ParseError,
    },
}

impl JsonPathError {
    fn malformed(expression: &str, source: ParseError) -> Self {
        JsonPathError::MalformedQuery {
            expression: expression.to_string(),
            source,
        }
    }
}

impl JsonPathParser<'_> {
    /// Parse, reporting failures with the offending expression attached.
    pub fn compile(expression: &str) -> Result<JSONPath, JsonPathError> {
        JsonPathParser::parse(expression).map_err(|e| JsonPathError::malformed(expression, e))
    }
}

/// Evaluate `expression` against `doc`.
///
/// Matches are returned in evaluation order and may repeat.
pub fn query<'a>(doc: &'a Value, expression: &str) -> Result<Vec<&'a Value>, JsonPathError> {
    let path = JsonPathParser::compile(expression)?;
    Ok(JsonPathEval::eval(&path, doc))
}

/// Evaluate `expression` and return the RFC 6901 pointer of every match.
pub fn query_pointers(doc: &Value, expression: &str) -> Result<Vec<String>, JsonPathError> {
    let path = JsonPathParser::compile(expression)?;
    Ok(JsonPathEval::eval_with_paths(&path, doc).pointers())
}

/// Like [`query`], reusing parsed expressions held in `cache`.
pub fn query_cached<'a>(
    cache: &mut QueryCache,
    doc: &'a Value,
    expression: &str,
) -> Result<Vec<&'a Value>, JsonPathError> {
    let path: Arc<JSONPath> = cache
        .get_or_parse(expression)
        .map_err(|e| JsonPathError::malformed(expression, e))?;
    Ok(JsonPathEval::eval(&path, doc))
}
