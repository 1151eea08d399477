//! `json-patch`: apply a JSON Patch (RFC 6902) to a document.
//!
//! Usage:
//!   json-patch '<patch-array-json>'
//!
//! The document is read from stdin. The patch operations are the first argument.

use std::process::ExitCode;

use jsonkit::json_cli::{apply_patch_text, finish, init_logging, read_stdin, JsonSerializer};

fn main() -> ExitCode {
    init_logging();
    let Some(patch) = std::env::args().nth(1) else {
        eprintln!("First argument must be a JSON patch array.");
        return ExitCode::FAILURE;
    };
    finish(read_stdin().map_err(jsonkit::Error::from).and_then(|doc| {
        apply_patch_text(&JsonSerializer::pretty(), &doc, &patch)
    }))
}
