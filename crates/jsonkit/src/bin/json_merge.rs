//! `json-merge`: merge a document into another, or diff the two.
//!
//! Usage:
//!   json-merge '<source-json>' [strategy]
//!
//! The target document is read from stdin. `strategy` defaults to
//! `merge_patch`; a diff strategy (`structural`, `rfc6902`, `detailed`,
//! `summary`) prints the report from stdin to the argument instead.

use std::process::ExitCode;

use jsonkit::json_cli::{diff_text, finish, init_logging, merge_text, read_stdin, JsonSerializer};
use jsonkit::strategy::{MergeStrategy, Strategy};

fn main() -> ExitCode {
    init_logging();
    let mut args = std::env::args().skip(1);
    let Some(source) = args.next() else {
        eprintln!("First argument must be a JSON document.");
        return ExitCode::FAILURE;
    };
    let strategy = match args.next() {
        Some(name) => name.parse::<Strategy>(),
        None => Ok(Strategy::Merge(MergeStrategy::MergePatch)),
    };
    let ser = JsonSerializer::pretty();
    finish(strategy.and_then(|strategy| {
        let doc = read_stdin()?;
        match strategy {
            Strategy::Merge(s) => merge_text(&ser, &doc, &source, s),
            Strategy::Diff(s) => diff_text(&ser, &doc, &source, s),
        }
    }))
}
