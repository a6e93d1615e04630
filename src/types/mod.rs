mod delimiter;
mod options;
mod value;

use std::fmt;

pub use delimiter::Delimiter;
pub use options::{DecodeOptions, EncodeOptions, Indent};
pub(crate) use value::{JsonValue, Number};

/// A short window of the surrounding input, attached to parse errors to make
/// them readable without a separate line-number lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub snippet: String,
}

impl ErrorContext {
    pub fn new(snippet: impl Into<String>) -> Self {
        Self {
            snippet: snippet.into(),
        }
    }

    /// Build a context snippet centered on `line` (1-based), including
    /// `radius` lines of surrounding context on each side.
    pub fn from_shared_input(
        input: std::sync::Arc<str>,
        line: usize,
        column: usize,
        radius: usize,
    ) -> Option<Self> {
        let lines: Vec<&str> = input.split('\n').collect();
        if line == 0 || line > lines.len() {
            return None;
        }

        let start = line.saturating_sub(1 + radius);
        let end = (line + radius).min(lines.len());

        let mut snippet = String::new();
        for (offset, text) in lines[start..end].iter().enumerate() {
            let current_line = start + offset + 1;
            let marker = if current_line == line { ">" } else { " " };
            snippet.push_str(&format!("{marker} {current_line:>4} | {text}\n"));
            if current_line == line {
                snippet.push_str(&format!("       {}^\n", " ".repeat(column.saturating_sub(1))));
            }
        }

        Some(Self { snippet })
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snippet)
    }
}

/// Errors produced by encoding or decoding TOON.
#[derive(Debug, thiserror::Error)]
pub enum ToonError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("invalid delimiter: {0}")]
    InvalidDelimiter(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch {
        expected: usize,
        found: usize,
        context: Option<Box<ErrorContext>>,
    },

    #[error("parse error at line {line}, column {column}: {message}{}",
        suggestion.as_deref().map(|s| format!(" ({s})")).unwrap_or_default())]
    ParseError {
        line: usize,
        column: usize,
        message: String,
        suggestion: Option<String>,
        context: Option<Box<ErrorContext>>,
    },

    #[error("{0}")]
    Custom(String),
}

pub type ToonResult<T> = Result<T, ToonError>;

impl ToonError {
    pub fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Self {
        ToonError::ParseError {
            line,
            column,
            message: message.into(),
            suggestion: None,
            context: None,
        }
    }

    pub fn length_mismatch(expected: usize, found: usize) -> Self {
        ToonError::LengthMismatch {
            expected,
            found,
            context: None,
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ToonError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach a human suggestion to a parse error. No-op on other variants.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        if let ToonError::ParseError {
            suggestion: slot, ..
        } = &mut self
        {
            *slot = Some(suggestion.into());
        }
        self
    }
}

impl serde::ser::Error for ToonError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ToonError::Custom(msg.to_string())
    }
}

impl serde::de::Error for ToonError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ToonError::Custom(msg.to_string())
    }
}

/// Whether a dotted-path segment (one component between dots) is a valid
/// bare identifier: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
/// ```
/// use serde_toon::is_identifier_segment;
///
/// assert!(is_identifier_segment("user_name"));
/// assert!(!is_identifier_segment("1bad"));
/// ```
pub fn is_identifier_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let first = bytes[0];
    if !first.is_ascii_alphabetic() && first != b'_' {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
