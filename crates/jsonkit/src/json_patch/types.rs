//! Core types for the JSON Patch module.

use jsonkit_json_pointer::{format_json_pointer, JsonPointerError};
use serde_json::Value;
use thiserror::Error;

pub use jsonkit_json_pointer::Path;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// `remove`, `test`, a `from` pointer or a parent container did not resolve.
    #[error("PATH_NOT_FOUND: {pointer:?}")]
    PathNotFound { pointer: String },
    /// `replace` targeted a location holding no value.
    #[error("VALUE_NOT_FOUND: {pointer:?}")]
    ValueNotFound { pointer: String },
    #[error("MISSING_FROM_PATH: {op:?} requires \"from\"")]
    MissingFromPath { op: String },
    #[error("TEST_FAILED: {pointer:?}")]
    TestFailed { pointer: String },
    #[error("UNKNOWN_OPERATION: {op:?}")]
    UnknownOperation { op: String },
    #[error("MALFORMED_POINTER: {pointer:?}")]
    MalformedPointer { pointer: String },
    /// The location exists but cannot take the operation, such as moving a
    /// value into its own child or indexing into a scalar.
    #[error("INVALID_TARGET: {pointer:?}")]
    InvalidTarget { pointer: String },
    #[error("INVALID_OP: {0}")]
    InvalidOp(String),
}

impl PatchError {
    pub(crate) fn path_not_found(path: &[String]) -> Self {
        PatchError::PathNotFound {
            pointer: format_json_pointer(path),
        }
    }

    pub(crate) fn value_not_found(path: &[String]) -> Self {
        PatchError::ValueNotFound {
            pointer: format_json_pointer(path),
        }
    }

    pub(crate) fn invalid_target(path: &[String]) -> Self {
        PatchError::InvalidTarget {
            pointer: format_json_pointer(path),
        }
    }

    pub(crate) fn test_failed(path: &[String]) -> Self {
        PatchError::TestFailed {
            pointer: format_json_pointer(path),
        }
    }
}

impl From<JsonPointerError> for PatchError {
    fn from(err: JsonPointerError) -> Self {
        match err {
            JsonPointerError::MalformedPointer { pointer } => {
                PatchError::MalformedPointer { pointer }
            }
            JsonPointerError::PathNotFound { pointer } => PatchError::PathNotFound { pointer },
            other => PatchError::InvalidOp(other.to_string()),
        }
    }
}

// ── Op enum ───────────────────────────────────────────────────────────────

/// A JSON Patch operation (RFC 6902).
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: Path, value: Value },
    Remove { path: Path },
    Replace { path: Path, value: Value },
    Move { path: Path, from: Path },
    Copy { path: Path, from: Path },
    Test { path: Path, value: Value },
}

impl Op {
    /// The wire name of the operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
        }
    }

    /// Returns the path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    /// The source path of `move` and `copy`.
    pub fn from(&self) -> Option<&Path> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }
}

// ── Result types ──────────────────────────────────────────────────────────

/// Result of applying a single operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult {
    /// The document after applying the operation.
    pub doc: Value,
    /// The value the operation displaced or removed, if any.
    pub old: Option<Value>,
}

/// Result of applying a full patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchResult {
    pub doc: Value,
    pub res: Vec<OpResult>,
}

/// Options for in-place patch application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPatchOptions {
    /// Restore the document to its starting state when any operation fails.
    ///
    /// With `false`, operations that ran before the failing one stay applied.
    pub atomic: bool,
    /// Let `add` create missing intermediate objects on its way to the target.
    pub create_missing: bool,
}

impl ApplyPatchOptions {
    /// Non-atomic application: a failed batch leaves its applied prefix in place.
    pub fn compat() -> Self {
        Self {
            atomic: false,
            ..Self::default()
        }
    }
}

impl Default for ApplyPatchOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            create_missing: true,
        }
    }
}
