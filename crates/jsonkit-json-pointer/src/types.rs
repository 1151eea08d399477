//! Type definitions for JSON Pointer.

use std::fmt;
use std::str::FromStr;

use crate::{format_json_pointer, parse_json_pointer, JsonPointerError};

/// A single, unescaped reference token.
pub type PathStep = String;

/// A JSON Pointer split into its reference tokens.
pub type Path = Vec<PathStep>;

/// An owned, already validated JSON Pointer.
///
/// `Display` renders the RFC 6901 text form, so `Pointer::parse(&p.to_string())`
/// always yields `p` back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer {
    tokens: Path,
}

impl Pointer {
    /// The empty pointer, addressing the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse RFC 6901 text.
    pub fn parse(text: &str) -> Result<Self, JsonPointerError> {
        parse_json_pointer(text).map(Self::from_tokens)
    }

    /// Build a pointer from unescaped tokens.
    pub fn from_tokens(tokens: Path) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Path {
        self.tokens
    }

    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Append one unescaped token.
    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    /// A new pointer one level deeper than `self`.
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut out = self.clone();
        out.push(token);
        out
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_json_pointer(&self.tokens))
    }
}

impl FromStr for Pointer {
    type Err = JsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[String]> for Pointer {
    fn as_ref(&self) -> &[String] {
        &self.tokens
    }
}

impl From<Path> for Pointer {
    fn from(tokens: Path) -> Self {
        Self::from_tokens(tokens)
    }
}

/// Options for [`set`](crate::set) and [`set_mut`](crate::set_mut).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Create an empty object for every missing intermediate object key.
    ///
    /// RFC 6901 does not define this; it is off unless asked for.
    pub create_missing: bool,
}

impl SetOptions {
    /// Options with intermediate auto-creation turned on.
    pub fn create_missing() -> Self {
        Self { create_missing: true }
    }
}
