//! `json-pointer`: look up a JSON Pointer (RFC 6901) in a document.
//!
//! Usage:
//!   json-pointer '/path/to/value'
//!
//! The document is read from stdin.

use std::process::ExitCode;

use jsonkit::json_cli::{finish, get_pointer_text, init_logging, read_stdin, JsonSerializer};

fn main() -> ExitCode {
    init_logging();
    let Some(pointer) = std::env::args().nth(1) else {
        eprintln!("First argument must be a JSON Pointer.");
        return ExitCode::FAILURE;
    };
    finish(read_stdin().map_err(jsonkit::Error::from).and_then(|doc| {
        get_pointer_text(&JsonSerializer::pretty(), &doc, &pointer)
    }))
}
