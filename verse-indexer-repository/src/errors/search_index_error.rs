//! Search index error types.
//!
//! This module defines the error types that can occur during search index
//! operations.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to open or create the index at its configured path.
    #[error("Open error: {0}")]
    OpenError(String),

    /// The index was corrupt and could not be recovered by recreation.
    #[error("Corruption error: {0}")]
    CorruptionError(String),

    /// A batch write failed; the batch was rolled back.
    #[error("Write error: {0}")]
    WriteError(String),

    /// A query could not be executed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The document count could not be read.
    #[error("Count error: {0}")]
    CountError(String),
}

impl SearchIndexError {
    /// Create an open error.
    pub fn open(msg: impl Into<String>) -> Self {
        Self::OpenError(msg.into())
    }

    /// Create a corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Self::CorruptionError(msg.into())
    }

    /// Create a write error.
    pub fn write(msg: impl Into<String>) -> Self {
        Self::WriteError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a count error.
    pub fn count(msg: impl Into<String>) -> Self {
        Self::CountError(msg.into())
    }
}
