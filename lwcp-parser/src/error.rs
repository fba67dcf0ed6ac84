//! Error types for LWCP line parsing

use thiserror::Error;

/// Errors that can occur while parsing a single protocol line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line was empty or whitespace only
    #[error("Empty line")]
    Empty,

    /// The line does not follow the message grammar
    #[error("Invalid syntax at '{remainder}' in line: {line}")]
    Syntax {
        /// The full line that failed to parse
        line: String,
        /// The unparsed remainder where the grammar stopped matching
        remainder: String,
    },
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
