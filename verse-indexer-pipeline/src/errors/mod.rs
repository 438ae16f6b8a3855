//! Error types for the verse indexer pipeline.

use thiserror::Error;
use verse_indexer_repository::SearchIndexError;

/// Errors raised by the upstream content source.
///
/// All variants are treated as transient by the orchestrator: a fetch is
/// retried up to the configured attempt count before its partition is marked
/// failed.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure (connection, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream responded with a non-success status.
    #[error("Upstream responded with status {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl SourceError {
    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Errors that can occur during a reindex run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A reindex run is already in flight; the trigger was ignored.
    #[error("Reindex already running")]
    AlreadyRunning,

    /// The run deadline expired before all partitions were processed.
    /// Batches committed before expiry stand.
    #[error("Reindex deadline exceeded after {completed} of {total} partitions")]
    DeadlineExceeded { completed: u32, total: u32 },

    /// The run was cancelled by a shutdown signal.
    #[error("Reindex cancelled after {completed} of {total} partitions")]
    Cancelled { completed: u32, total: u32 },

    /// A batch write into the index failed; fatal to the run.
    #[error("Index write error: {0}")]
    IndexWrite(#[from] SearchIndexError),

    /// The run finished but one or more partitions failed every fetch
    /// attempt. The successfully indexed partitions stand; callers should
    /// re-run to complete the corpus.
    #[error("Reindex completed with {failed} failed partitions out of {total}")]
    PartialFailure { failed: u32, total: u32 },
}
