//! Orchestrator module for the verse indexer pipeline.
//!
//! Coordinates the source, processor and loader components through one full
//! reindex run.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::errors::{IngestError, SourceError};
use crate::loader::{IndexLoader, LoaderConfig};
use crate::processor::VerseProcessor;
use crate::source::{ContentSource, VerseRecord};
use verse_indexer_repository::SearchIndexProvider;

/// Configuration for the reindex orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of chapter partitions in the corpus.
    pub total_partitions: u32,
    /// Fetch attempts per partition before it is marked failed.
    pub fetch_attempts: u32,
    /// Fixed delay between fetch attempts.
    pub retry_delay: Duration,
    /// Loader batch size.
    pub batch_size: usize,
    /// Record limit per partition fetch; the largest chapter has 286 verses.
    pub partition_fetch_limit: u32,
    /// Emit a progress observation every this many partitions.
    pub progress_interval: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            total_partitions: 114,
            fetch_attempts: 3,
            retry_delay: Duration::from_secs(2),
            batch_size: 1000,
            partition_fetch_limit: 300,
            progress_interval: 10,
        }
    }
}

/// Outcome of an administrative reindex trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The trigger was accepted and a background run started.
    Accepted,
    /// A run was already in flight; the trigger was ignored.
    AlreadyRunning,
}

/// Result of a completed reindex run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindexSummary {
    /// Documents flushed into the index during this run.
    pub indexed_count: u64,
    /// Partitions that failed every fetch attempt.
    pub failed_partitions: u32,
    /// Partitions the run covered.
    pub total_partitions: u32,
}

/// Orchestrator for full reindex runs.
///
/// At most one run may be in flight process-wide: the in-progress flag is
/// claimed atomically and a concurrent invocation is rejected immediately,
/// never queued. Partitions are processed sequentially to respect upstream
/// load. A partition that fails every fetch attempt is recorded and skipped;
/// the run continues, and the final result reports the failure count so
/// operators know the corpus is incomplete.
pub struct ReindexOrchestrator {
    source: Arc<dyn ContentSource>,
    store: Arc<dyn SearchIndexProvider>,
    processor: VerseProcessor,
    config: OrchestratorConfig,
    in_progress: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
}

impl ReindexOrchestrator {
    /// Create a new orchestrator with the default configuration.
    pub fn new(source: Arc<dyn ContentSource>, store: Arc<dyn SearchIndexProvider>) -> Self {
        Self::with_config(source, store, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        source: Arc<dyn ContentSource>,
        store: Arc<dyn SearchIndexProvider>,
        config: OrchestratorConfig,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            source,
            store,
            processor: VerseProcessor::new(),
            config,
            in_progress: AtomicBool::new(false),
            shutdown_tx,
        }
    }

    /// Whether a reindex run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Signal the in-flight run (if any) to stop before its next partition.
    /// Already-committed batches are never unwound.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Run a full reindex, blocking until it completes or fails.
    ///
    /// Returns [`IngestError::AlreadyRunning`] immediately when another run
    /// holds the in-progress flag.
    #[instrument(skip(self))]
    pub async fn run_full_reindex(
        &self,
        deadline: Duration,
    ) -> Result<ReindexSummary, IngestError> {
        if !self.acquire() {
            warn!("reindex trigger ignored, a run is already in progress");
            return Err(IngestError::AlreadyRunning);
        }
        let result = self.execute(deadline).await;
        self.in_progress.store(false, Ordering::SeqCst);
        result
    }

    /// Idempotent administrative trigger: start a background run unless one
    /// is already in flight.
    pub fn try_trigger(self: Arc<Self>, deadline: Duration) -> TriggerOutcome {
        if !self.acquire() {
            info!("reindex trigger ignored, a run is already in progress");
            return TriggerOutcome::AlreadyRunning;
        }

        tokio::spawn(async move {
            let result = self.execute(deadline).await;
            self.in_progress.store(false, Ordering::SeqCst);
            match result {
                Ok(summary) => info!(
                    indexed = summary.indexed_count,
                    "background reindex completed"
                ),
                Err(e) => error!(error = %e, "background reindex failed"),
            }
        });
        TriggerOutcome::Accepted
    }

    fn acquire(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// The run itself. The caller owns the in-progress flag.
    async fn execute(&self, deadline: Duration) -> Result<ReindexSummary, IngestError> {
        let total = self.config.total_partitions;
        let started = Instant::now();
        let expires = started + deadline;
        let shutdown_rx = self.shutdown_tx.subscribe();

        let mut loader = IndexLoader::with_config(
            self.store.clone(),
            LoaderConfig {
                batch_size: self.config.batch_size,
            },
        );
        let mut succeeded: u32 = 0;
        let mut failed: u32 = 0;

        info!(total_partitions = total, "Starting full reindex");

        for partition in 1..=total {
            let completed = partition - 1;
            if Instant::now() >= expires {
                warn!(completed, total, "reindex deadline exceeded, stopping run");
                return Err(IngestError::DeadlineExceeded { completed, total });
            }
            if *shutdown_rx.borrow() {
                warn!(completed, total, "reindex cancelled, stopping run");
                return Err(IngestError::Cancelled { completed, total });
            }

            let records = match self.fetch_partition_with_retry(partition).await {
                Ok(records) => records,
                Err(e) => {
                    error!(
                        partition,
                        attempts = self.config.fetch_attempts,
                        error = %e,
                        "partition failed every fetch attempt, continuing"
                    );
                    failed += 1;
                    continue;
                }
            };

            if records.is_empty() {
                warn!(partition, "partition returned no records");
                failed += 1;
                continue;
            }

            for record in records {
                if !self.processor.is_valid(&record) {
                    continue;
                }

                // Commentary enrichment is best-effort: a failed secondary
                // fetch leaves the commentary fields empty.
                let commentary = match self.source.get_verse_commentary(record.record_id).await
                {
                    Ok(commentary) => Some(commentary),
                    Err(e) => {
                        warn!(
                            record_id = record.record_id,
                            error = %e,
                            "commentary fetch failed, leaving commentary empty"
                        );
                        None
                    }
                };

                let document = self.processor.to_document(record, commentary);
                loader.push(document).await?;
            }
            succeeded += 1;

            if partition % self.config.progress_interval == 0 || partition == total {
                info!(
                    partition,
                    total,
                    succeeded,
                    failed,
                    elapsed_secs = started.elapsed().as_secs(),
                    "Reindex progress"
                );
            }
        }

        let indexed_count = loader.finish().await?;

        info!(
            indexed = indexed_count,
            succeeded,
            failed,
            elapsed_secs = started.elapsed().as_secs(),
            "Reindex run finished"
        );

        if failed > 0 {
            return Err(IngestError::PartialFailure { failed, total });
        }

        Ok(ReindexSummary {
            indexed_count,
            failed_partitions: failed,
            total_partitions: total,
        })
    }

    /// Fetch one partition with a fixed number of attempts and a fixed delay
    /// between them.
    async fn fetch_partition_with_retry(
        &self,
        partition: u32,
    ) -> Result<Vec<VerseRecord>, SourceError> {
        let mut last_error: Option<SourceError> = None;

        for attempt in 1..=self.config.fetch_attempts {
            match self
                .source
                .get_chapter_verses(partition, 0, self.config.partition_fetch_limit)
                .await
            {
                Ok(records) => {
                    if attempt > 1 {
                        info!(partition, attempt, "partition fetch succeeded after retry");
                    }
                    return Ok(records);
                }
                Err(e) => {
                    if attempt < self.config.fetch_attempts {
                        warn!(
                            partition,
                            attempt,
                            max_attempts = self.config.fetch_attempts,
                            delay_secs = self.config.retry_delay.as_secs(),
                            error = %e,
                            "partition fetch failed, retrying"
                        );
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| SourceError::decode("no fetch attempts configured")))
    }
}
