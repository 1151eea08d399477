//! JSON Pointer (RFC 6901) utilities.
//!
//! Parses and formats [JSON Pointers](https://tools.ietf.org/html/rfc6901)
//! and resolves, sets and removes values in a `serde_json::Value` tree.
//!
//! # Example
//!
//! ```
//! use jsonkit_json_pointer::{format_json_pointer, get, parse_json_pointer, set, SetOptions};
//! use serde_json::json;
//!
//! let path = parse_json_pointer("/a/b").unwrap();
//! assert_eq!(path, vec!["a".to_string(), "b".to_string()]);
//! assert_eq!(format_json_pointer(&path), "/a/b");
//!
//! let doc = json!({"a": {"b": 1}});
//! assert_eq!(get(&doc, &path).unwrap(), &json!(1));
//!
//! let c = parse_json_pointer("/a/c").unwrap();
//! let out = set(&doc, &c, json!(2), &SetOptions::default()).unwrap();
//! assert_eq!(out, json!({"a": {"b": 1, "c": 2}}));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep, Pointer, SetOptions};

mod util;
pub use util::{array_index, escape_component, is_child, is_root, is_valid_index, parent, unescape_component};

mod get;
pub use get::{get, get_mut, has};

mod set;
pub use set::{set, set_mut};

mod remove;
pub use remove::{remove, remove_mut};

pub mod validate;
pub use validate::{validate_json_pointer, validate_path};

/// Parse a JSON Pointer string into unescaped path components.
///
/// The empty string is the root. Anything else must start with `/`, and every
/// `~` must be followed by `0` or `1`.
///
/// # Example
///
/// ```
/// use jsonkit_json_pointer::parse_json_pointer;
///
/// assert_eq!(parse_json_pointer("").unwrap(), Vec::<String>::new());
/// assert_eq!(parse_json_pointer("/").unwrap(), vec![""]);
/// assert_eq!(parse_json_pointer("/a~0b/c~1d").unwrap(), vec!["a~b", "c/d"]);
/// assert!(parse_json_pointer("a/b").is_err());
/// ```
pub fn parse_json_pointer(pointer: &str) -> Result<Path, JsonPointerError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let malformed = || JsonPointerError::MalformedPointer {
        pointer: pointer.to_string(),
    };
    let rest = pointer.strip_prefix('/').ok_or_else(malformed)?;
    rest.split('/')
        .map(|component| {
            if util::has_valid_escapes(component) {
                Ok(unescape_component(component))
            } else {
                Err(malformed())
            }
        })
        .collect()
}

/// Format path components into a JSON Pointer string.
///
/// Returns an empty string for the root path.
///
/// # Example
///
/// ```
/// use jsonkit_json_pointer::format_json_pointer;
///
/// assert_eq!(format_json_pointer(&[]), "");
/// assert_eq!(format_json_pointer(&["a/b".to_string(), "~".to_string()]), "/a~1b/~0");
/// ```
pub fn format_json_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonPointerError {
    #[error("MALFORMED_POINTER: {pointer:?}")]
    MalformedPointer { pointer: String },
    #[error("PATH_NOT_FOUND: {pointer:?}")]
    PathNotFound { pointer: String },
    #[error("NO_PARENT")]
    NoParent,
    #[error("POINTER_TOO_LONG")]
    PointerTooLong,
    #[error("PATH_TOO_LONG")]
    PathTooLong,
}

impl JsonPointerError {
    pub(crate) fn not_found(path: &[String]) -> Self {
        JsonPointerError::PathNotFound {
            pointer: format_json_pointer(path),
        }
    }

    /// The pointer text the error refers to, when there is one.
    pub fn pointer(&self) -> Option<&str> {
        match self {
            JsonPointerError::MalformedPointer { pointer }
            | JsonPointerError::PathNotFound { pointer } => Some(pointer),
            _ => None,
        }
    }
}
