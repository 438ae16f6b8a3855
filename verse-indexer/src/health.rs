//! Health monitoring over the search index.
//!
//! Probes are constant-time relative to index size: only the document count
//! is consulted. A reachable store with zero documents is still healthy; the
//! report message distinguishes that case for operators.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use verse_indexer_repository::SearchIndexProvider;

/// Overall health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Readiness classification, derived from the same probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// A health report for operational consumers.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Overall classification.
    pub status: HealthStatus,
    /// Documents currently in the index.
    pub doc_count: u64,
    /// Human-readable detail.
    pub message: String,
}

/// Health monitor over the search index store.
pub struct HealthMonitor {
    store: Arc<dyn SearchIndexProvider>,
}

impl HealthMonitor {
    /// Create a new monitor over the given store.
    pub fn new(store: Arc<dyn SearchIndexProvider>) -> Self {
        Self { store }
    }

    /// Probe the store and classify its health.
    pub async fn check(&self) -> HealthReport {
        if !self.store.health_probe().await {
            warn!("search index health probe failed");
            return HealthReport {
                status: HealthStatus::Degraded,
                doc_count: 0,
                message: "search index is not accessible".to_string(),
            };
        }

        match self.store.count().await {
            Ok(0) => HealthReport {
                status: HealthStatus::Healthy,
                doc_count: 0,
                message: "search index is accessible (no documents indexed)".to_string(),
            },
            Ok(doc_count) => HealthReport {
                status: HealthStatus::Healthy,
                doc_count,
                message: "search index is accessible (indexed documents available)".to_string(),
            },
            Err(e) => {
                warn!(error = %e, "failed to read document count");
                HealthReport {
                    status: HealthStatus::Degraded,
                    doc_count: 0,
                    message: format!("failed to read document count: {e}"),
                }
            }
        }
    }

    /// Readiness probe: ready iff the store probe succeeds.
    pub async fn readiness(&self) -> ReadinessStatus {
        if self.store.health_probe().await {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::NotReady
        }
    }

    /// Liveness probe: a trivial, store-independent process-alive signal.
    pub fn liveness(&self) -> &'static str {
        "alive"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use verse_indexer_repository::SearchIndexError;
    use verse_indexer_shared::{SearchRequest, SearchResponse, VerseDocument};

    struct MockStore {
        doc_count: u64,
        reachable: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MockStore {
        async fn batch_upsert(
            &self,
            _documents: &[VerseDocument],
        ) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn count(&self) -> Result<u64, SearchIndexError> {
            if self.reachable {
                Ok(self.doc_count)
            } else {
                Err(SearchIndexError::count("index unreachable"))
            }
        }

        async fn health_probe(&self) -> bool {
            self.reachable
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

    fn monitor(doc_count: u64, reachable: bool) -> HealthMonitor {
        HealthMonitor::new(Arc::new(MockStore {
            doc_count,
            reachable,
        }))
    }

    #[tokio::test]
    async fn test_empty_reachable_store_is_healthy_with_warning_message() {
        let report = monitor(0, true).check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.doc_count, 0);
        assert!(report.message.contains("no documents indexed"));
    }

    #[tokio::test]
    async fn test_populated_store_is_healthy() {
        let report = monitor(6236, true).check().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.doc_count, 6236);
        assert!(report.message.contains("indexed documents available"));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_degraded() {
        let report = monitor(0, false).check().await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert!(report.message.contains("not accessible"));
    }

    #[tokio::test]
    async fn test_readiness_follows_probe() {
        assert_eq!(monitor(0, true).readiness().await, ReadinessStatus::Ready);
        assert_eq!(
            monitor(0, false).readiness().await,
            ReadinessStatus::NotReady
        );
    }

    #[test]
    fn test_liveness_is_store_independent() {
        let monitor = monitor(0, false);
        assert_eq!(monitor.liveness(), "alive");
    }
}
