//! Dependency initialization and wiring for the verse indexer.

use std::sync::Arc;

use tracing::info;

use crate::health::HealthMonitor;
use crate::{IndexerError, Settings};
use verse_indexer_pipeline::source::{HttpContentSource, SourceConfig};
use verse_indexer_pipeline::ReindexOrchestrator;
use verse_indexer_repository::{IndexConfig, SearchIndexProvider, TantivyIndexStore};

/// Container for all initialized dependencies.
///
/// The orchestrator, the store and the health monitor are the three surfaces
/// the outer HTTP layer consumes: reindex trigger, search, and
/// health/readiness probes.
pub struct Dependencies {
    /// The search index store, shared between queries and ingestion.
    pub store: Arc<dyn SearchIndexProvider>,
    /// The reindex orchestrator.
    pub orchestrator: Arc<ReindexOrchestrator>,
    /// The health monitor over the store.
    pub monitor: HealthMonitor,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// Opens (or creates) the search index at its configured path and wires
    /// the content source client, the orchestrator and the health monitor
    /// around it.
    pub fn new(settings: &Settings) -> Result<Self, IndexerError> {
        info!(
            content_api_url = %settings.content_api_url,
            index_path = %settings.index_path,
            ngram_coverage = ?settings.ngram_coverage,
            "Initializing dependencies"
        );

        let store = TantivyIndexStore::open(
            &settings.index_path,
            IndexConfig {
                ngram_coverage: settings.ngram_coverage,
            },
        )?;
        let store: Arc<dyn SearchIndexProvider> = Arc::new(store);

        let source = HttpContentSource::new(SourceConfig {
            base_url: settings.content_api_url.clone(),
        })
        .map_err(|e| IndexerError::config(format!("failed to create content source: {e}")))?;

        let orchestrator = Arc::new(ReindexOrchestrator::new(Arc::new(source), store.clone()));
        let monitor = HealthMonitor::new(store.clone());

        Ok(Self {
            store,
            orchestrator,
            monitor,
        })
    }
}
