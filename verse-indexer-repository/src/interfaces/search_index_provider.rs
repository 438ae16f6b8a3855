//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (tantivy, mock, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use verse_indexer_shared::{SearchRequest, SearchResponse, VerseDocument};

/// Abstracts the underlying search index implementation.
///
/// The ingestion pipeline and the health monitor are written against this
/// trait rather than a concrete backend, so tests can substitute mock
/// implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`: queries may run concurrently
/// with each other and with an in-flight batch write.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Index a batch of documents, replacing any existing documents with the
    /// same `"chapter:verse"` key.
    ///
    /// The whole batch commits or the whole batch fails; there is no
    /// per-document partial outcome and no internal retry. Retry policy is
    /// owned by the caller.
    ///
    /// # Arguments
    ///
    /// * `documents` - The verse documents to upsert
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the batch was committed
    /// * `Err(SearchIndexError::WriteError)` - If the batch failed and was rolled back
    async fn batch_upsert(&self, documents: &[VerseDocument]) -> Result<(), SearchIndexError>;

    /// Number of documents currently in the index.
    async fn count(&self) -> Result<u64, SearchIndexError>;

    /// Liveness probe for the index.
    ///
    /// # Returns
    ///
    /// `true` iff [`count`](Self::count) succeeds.
    async fn health_probe(&self) -> bool;

    /// Execute a ranked, paginated full-text query.
    ///
    /// # Arguments
    ///
    /// * `request` - Query text plus 1-based page and clamped limit
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResponse)` - Hits for the requested page plus the total match count
    /// * `Err(SearchIndexError::QueryError)` - If the query fails; never retried here
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchIndexError>;
}
