//! JSON Patch implementation (RFC 6902).
//!
//! # Operations
//!
//! All standard RFC 6902 operations are supported:
//! `add`, `remove`, `replace`, `copy`, `move`, `test`.
//!
//! [`apply_patch`] works on a copy and never touches its input.
//! [`apply_patch_mut`] edits in place and, by default, rolls the document back
//! when an operation fails (see [`ApplyPatchOptions`]).

pub mod types;
pub mod apply;
pub mod codec;

pub use types::{ApplyPatchOptions, Op, OpResult, PatchError, PatchResult};
pub use apply::{apply_op, apply_ops, apply_patch, apply_patch_mut, test_patch};
pub use codec::json::{from_json, from_json_patch, to_json, to_json_patch};
