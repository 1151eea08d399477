//! Crate-level error type.

use jsonkit_json_path::JsonPathError;
use jsonkit_json_pointer::JsonPointerError;
use thiserror::Error;

use crate::json_patch::PatchError;

/// Any failure surfaced by the toolkit's entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pointer(#[from] JsonPointerError),
    #[error(transparent)]
    Path(#[from] JsonPathError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    /// A strategy identifier used on the wrong axis, or not known at all.
    #[error("UNSUPPORTED_STRATEGY: {strategy:?} is not a {axis} strategy")]
    UnsupportedStrategy {
        strategy: String,
        axis: &'static str,
    },
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
