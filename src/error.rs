//! Error types for the aggregation pipeline

use thiserror::Error;

/// Why a single input line could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected 2 fields separated by ';', found {0}")]
    FieldCount(usize),

    #[error("cannot parse {0:?} as a number")]
    InvalidNumber(String),
}

/// A malformed line, identified by its 1-based line number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    pub line: usize,
    pub reason: ParseErrorKind,
}

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {input} near line {line}: {source}")]
    Io {
        input: String,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    Parse(#[from] ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
