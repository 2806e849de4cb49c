//! Error types for the boolsearch library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`BoolSearchError`] enum. Searchers propagate the errors of their children
//! unchanged, so a failure raised deep inside a leaf reaches the caller of the
//! outermost searcher as-is.
//!
//! # Examples
//!
//! ```
//! use boolsearch::error::{BoolSearchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BoolSearchError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for boolsearch operations.
#[derive(Error, Debug)]
pub enum BoolSearchError {
    /// I/O errors (reading index or plan files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Index-related errors.
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (invalid plans, bad clause shapes).
    #[error("Query error: {0}")]
    Query(String),

    /// Failures raised by a searcher while iterating or closing.
    #[error("Searcher error: {0}")]
    Searcher(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with BoolSearchError.
pub type Result<T> = std::result::Result<T, BoolSearchError>;

impl BoolSearchError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        BoolSearchError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        BoolSearchError::Query(msg.into())
    }

    /// Create a new searcher error.
    pub fn searcher<S: Into<String>>(msg: S) -> Self {
        BoolSearchError::Searcher(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        BoolSearchError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        BoolSearchError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = BoolSearchError::index("missing field");
        assert_eq!(error.to_string(), "Index error: missing field");

        let error = BoolSearchError::query("empty conjunction");
        assert_eq!(error.to_string(), "Query error: empty conjunction");

        let error = BoolSearchError::searcher("posting read failed");
        assert_eq!(error.to_string(), "Searcher error: posting read failed");

        let error = BoolSearchError::invalid_argument("min > clauses");
        assert_eq!(error.to_string(), "Error: Invalid argument: min > clauses");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = BoolSearchError::from(io_error);

        match error {
            BoolSearchError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
