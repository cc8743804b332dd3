//! Error types for the caselex library.
//!
//! All fallible operations return [`Result`], with [`CaselexError`] covering
//! storage, index-construction, and query-evaluation failures. Per-document
//! and per-query errors are recoverable (callers skip and continue); index
//! integrity errors are fatal because a silently corrupt index would return
//! wrong, unverifiable results.

use std::io;

use thiserror::Error;

/// The main error type for caselex operations.
#[derive(Error, Debug)]
pub enum CaselexError {
    /// I/O errors (file operations, seeks, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Index construction errors
    #[error("Index error: {0}")]
    Index(String),

    /// A document record that cannot be used for indexing.
    ///
    /// Recoverable: the build skips the document and continues.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Query-related errors (invalid query structure, etc.)
    ///
    /// Recoverable: the query yields an empty result.
    #[error("Query error: {0}")]
    Query(String),

    /// A dictionary or postings file that fails integrity checks.
    ///
    /// Fatal: partial or corrupt index files are never silently accepted.
    #[error("Corrupt index: {0}")]
    CorruptIndex(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with CaselexError.
pub type Result<T> = std::result::Result<T, CaselexError>;

impl CaselexError {
    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        CaselexError::Storage(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        CaselexError::Index(msg.into())
    }

    /// Create a new malformed-document error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        CaselexError::MalformedDocument(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        CaselexError::Query(msg.into())
    }

    /// Create a new corrupt-index error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        CaselexError::CorruptIndex(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CaselexError::Other(msg.into())
    }
}
