//! Loader module for the verse indexer pipeline.
//!
//! Buffers documents during a reindex run and flushes batches into the
//! search index.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::errors::IngestError;
use verse_indexer_repository::SearchIndexProvider;
use verse_indexer_shared::VerseDocument;

/// Configuration for the index loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents to buffer before flushing a batch.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

/// Loader that batches documents into the search index.
///
/// One loader exists per reindex run and is discarded with it. A batch
/// write failure is fatal to the run: there is no partial-batch recovery,
/// so the error propagates immediately to the orchestrator.
pub struct IndexLoader {
    store: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
    pending: Vec<VerseDocument>,
    flushed: u64,
}

impl IndexLoader {
    /// Create a new loader with the default batch size.
    pub fn new(store: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(store, LoaderConfig::default())
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(store: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        let batch_size = config.batch_size;
        Self {
            store,
            config,
            pending: Vec::with_capacity(batch_size),
            flushed: 0,
        }
    }

    /// Buffer one document, flushing when the batch size is reached.
    pub async fn push(&mut self, document: VerseDocument) -> Result<(), IngestError> {
        self.pending.push(document);
        if self.pending.len() >= self.config.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Flush all pending documents as one batch upsert.
    #[instrument(skip(self))]
    pub async fn flush(&mut self) -> Result<(), IngestError> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let batch: Vec<VerseDocument> = self.pending.drain(..).collect();
        let count = batch.len();

        self.store.batch_upsert(&batch).await?;
        self.flushed += count as u64;
        debug!(count = count, total = self.flushed, "Flushed document batch");
        Ok(())
    }

    /// Flush any remaining documents and return the total flushed this run.
    pub async fn finish(mut self) -> Result<u64, IngestError> {
        self.flush().await?;
        Ok(self.flushed)
    }

    /// Number of documents currently buffered.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use verse_indexer_repository::{SearchIndexError, SearchIndexProvider};
    use verse_indexer_shared::{SearchRequest, SearchResponse};

    /// Mock store that records batch sizes.
    #[derive(Default)]
    struct MockStore {
        batches: Mutex<Vec<usize>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MockStore {
        async fn batch_upsert(
            &self,
            documents: &[VerseDocument],
        ) -> Result<(), SearchIndexError> {
            if self.fail_writes {
                return Err(SearchIndexError::write("disk full"));
            }
            self.batches.lock().unwrap().push(documents.len());
            Ok(())
        }

        async fn count(&self) -> Result<u64, SearchIndexError> {
            Ok(self.batches.lock().unwrap().iter().map(|n| *n as u64).sum())
        }

        async fn health_probe(&self) -> bool {
            true
        }

        async fn search(
            &self,
            request: &SearchRequest,
        ) -> Result<SearchResponse, SearchIndexError> {
            Ok(SearchResponse::empty(
                request.effective_page(),
                request.effective_limit(),
            ))
        }
    }

    fn doc(verse: u32) -> VerseDocument {
        VerseDocument::new(1, verse).with_translated_text("text")
    }

    #[tokio::test]
    async fn test_flushes_at_batch_size() {
        let store = Arc::new(MockStore::default());
        let mut loader =
            IndexLoader::with_config(store.clone(), LoaderConfig { batch_size: 3 });

        for verse in 1..=7 {
            loader.push(doc(verse)).await.unwrap();
        }
        assert_eq!(loader.pending_len(), 1);

        let flushed = loader.finish().await.unwrap();
        assert_eq!(flushed, 7);
        assert_eq!(*store.batches.lock().unwrap(), vec![3, 3, 1]);
    }

    #[tokio::test]
    async fn test_finish_with_empty_buffer_is_noop() {
        let store = Arc::new(MockStore::default());
        let loader = IndexLoader::new(store.clone());

        let flushed = loader.finish().await.unwrap();
        assert_eq!(flushed, 0);
        assert!(store.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let store = Arc::new(MockStore {
            fail_writes: true,
            ..Default::default()
        });
        let mut loader = IndexLoader::with_config(store, LoaderConfig { batch_size: 1 });

        let err = loader.push(doc(1)).await.unwrap_err();
        assert!(matches!(err, IngestError::IndexWrite(_)));
    }
}
