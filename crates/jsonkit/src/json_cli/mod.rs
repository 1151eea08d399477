//! Text entry points and the shared plumbing of the command-line tools.
//!
//! Each entry point decodes its text inputs with a [`Serializer`], runs the
//! in-memory algorithm, and encodes the result with the same serializer:
//! - `json-patch`   apply a JSON Patch to a document
//! - `json-pointer` look up a JSON Pointer in a document
//! - `json-path`    run a JSONPath query against a document
//! - `json-merge`   merge two documents, or diff them with a diff strategy

use std::io::{self, Read, Write};

use jsonkit_json_path::query;
use jsonkit_json_pointer::{get, parse_json_pointer};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::json_patch::{apply_patch, from_json_patch};
use crate::strategy::{self, DiffStrategy, MergeStrategy};

// ── Serializer ────────────────────────────────────────────────────────────

/// Converts between document text and [`Value`].
pub trait Serializer {
    fn decode(&self, text: &str) -> Result<Value>;
    fn encode(&self, value: &Value) -> Result<String>;
}

/// JSON text via `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonSerializer {
    pub pretty: bool,
}

impl JsonSerializer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn decode(&self, text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }

    fn encode(&self, value: &Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Resolve `pointer` in the document.
pub fn get_pointer_text(ser: &impl Serializer, doc: &str, pointer: &str) -> Result<String> {
    let doc = ser.decode(doc)?;
    let path = parse_json_pointer(pointer)?;
    ser.encode(get(&doc, &path)?)
}

/// Apply a JSON Patch document to the document.
pub fn apply_patch_text(ser: &impl Serializer, doc: &str, patch: &str) -> Result<String> {
    let doc = ser.decode(doc)?;
    let ops = from_json_patch(&ser.decode(patch)?)?;
    ser.encode(&apply_patch(&doc, &ops)?)
}

/// Run a JSONPath query; the matches are encoded as an array.
pub fn query_text(ser: &impl Serializer, doc: &str, expression: &str) -> Result<String> {
    let doc = ser.decode(doc)?;
    let matches = query(&doc, expression)?;
    ser.encode(&Value::Array(matches.into_iter().cloned().collect()))
}

/// Merge `source` into `target`.
///
/// Conflicts found by the conflict-aware strategy are logged at `warn`; the
/// merged document is returned either way.
pub fn merge_text(
    ser: &impl Serializer,
    target: &str,
    source: &str,
    merge_strategy: MergeStrategy,
) -> Result<String> {
    let target = ser.decode(target)?;
    let source = ser.decode(source)?;
    let outcome = strategy::merge(merge_strategy, &target, &source);
    for conflict in &outcome.conflicts {
        tracing::warn!(path = %conflict.path, "conflicting edits, source value kept");
    }
    ser.encode(&outcome.result)
}

/// Diff `source` against `target`; the report is encoded as a document.
pub fn diff_text(
    ser: &impl Serializer,
    source: &str,
    target: &str,
    diff_strategy: DiffStrategy,
) -> Result<String> {
    let source = ser.decode(source)?;
    let target = ser.decode(target)?;
    let report = strategy::diff(diff_strategy, &source, &target);
    ser.encode(&serde_json::to_value(report)?)
}

// ── Binary plumbing ───────────────────────────────────────────────────────

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // Keeps any global subscriber that is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Read all of stdin, trimmed.
pub fn read_stdin() -> io::Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim().to_string())
}

/// Print a result line to stdout, or the error to stderr with exit code 1.
pub fn finish<E: std::fmt::Display>(result: std::result::Result<String, E>) -> std::process::ExitCode {
    match result {
        Ok(text) => {
            let mut stdout = io::stdout().lock();
            match writeln!(stdout, "{text}") {
                Ok(()) => std::process::ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
