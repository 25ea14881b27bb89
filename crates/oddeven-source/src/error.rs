//! Error types for the source module.

use thiserror::Error;

use oddeven_core::Value;

/// Errors that can occur while loading initial values.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decimal input is not valid UTF-8.
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// A token in decimal input is not an integer.
    #[error("malformed value {token:?} on line {line}")]
    Malformed { line: usize, token: String },

    /// A value cannot be represented in the requested format.
    #[error("value {value} does not fit in the {format} format")]
    OutOfRange { value: Value, format: &'static str },

    /// The source holds no values at all.
    #[error("input contains no values")]
    Empty,

    /// The source holds a different number of values than requested.
    #[error("expected {expected} values, found {got}")]
    CountMismatch { expected: usize, got: usize },
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
