//! Verse indexer entry point.
//!
//! Initializes logging and dependencies, reports index health, and runs a
//! full reindex when requested through the environment.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use verse_indexer::{Dependencies, IndexerError, Settings};

#[tokio::main]
async fn main() -> Result<(), IndexerError> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let deps = Dependencies::new(&settings)?;

    let report = deps.monitor.check().await;
    info!(
        status = ?report.status,
        doc_count = report.doc_count,
        message = %report.message,
        "Index health at startup"
    );

    if settings.reindex_on_start {
        info!(deadline_secs = settings.reindex_deadline.as_secs(), "Running full reindex");
        match deps
            .orchestrator
            .run_full_reindex(settings.reindex_deadline)
            .await
        {
            Ok(summary) => info!(
                indexed = summary.indexed_count,
                failed_partitions = summary.failed_partitions,
                total_partitions = summary.total_partitions,
                "Reindex completed"
            ),
            Err(e) => {
                error!(error = %e, "Reindex failed");
                return Err(e.into());
            }
        }

        let report = deps.monitor.check().await;
        info!(
            status = ?report.status,
            doc_count = report.doc_count,
            "Index health after reindex"
        );
    }

    Ok(())
}
