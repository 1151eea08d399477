//! `json-path`: run a JSONPath query against a document.
//!
//! Usage:
//!   json-path '$.store.book[?(@.price < 10)]'
//!
//! The document is read from stdin; the matches are printed as a JSON array.

use std::process::ExitCode;

use jsonkit::json_cli::{finish, init_logging, query_text, read_stdin, JsonSerializer};

fn main() -> ExitCode {
    init_logging();
    let Some(expression) = std::env::args().nth(1) else {
        eprintln!("First argument must be a JSONPath expression.");
        return ExitCode::FAILURE;
    };
    finish(read_stdin().map_err(jsonkit::Error::from).and_then(|doc| {
        query_text(&JsonSerializer::pretty(), &doc, &expression)
    }))
}
