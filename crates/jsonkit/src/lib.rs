//! jsonkit: structural operations on in-memory JSON documents.
//!
//! Addressing lives in the two leaf crates, re-exported here:
//! [`jsonkit_json_pointer`] (RFC 6901) and [`jsonkit_json_path`] (JSONPath).
//! This crate layers the document operations on top of them:
//!
//! - [`json_patch`]: RFC 6902 operations, atomic application, JSON codec
//! - [`json_patch_diff`]: patch generation between two documents
//! - [`json_merge`]: two-way merge strategies, RFC 7396, three-way conflicts
//! - [`json_diff`]: structural, detailed and summary diff reports
//! - [`strategy`]: string-addressable merge and diff selectors
//! - [`json_cli`]: text entry points behind the command-line tools

pub mod document;
pub mod error;

pub mod json_patch;
pub mod json_patch_diff;

pub mod json_merge;
pub mod json_diff;
pub mod strategy;

pub mod json_cli;

pub use error::{Error, Result};
pub use jsonkit_json_path;
pub use jsonkit_json_pointer;
