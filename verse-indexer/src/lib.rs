//! # Verse Indexer
//!
//! Main library for the verse search indexer.
//!
//! This crate provides the entry point, configuration and health monitoring
//! for running the indexer. The search and reindex operations themselves live
//! in the repository and pipeline crates; the outer HTTP layer consumes them
//! through [`config::Dependencies`].

pub mod config;
pub mod health;

pub use config::{Dependencies, Settings};
pub use health::{HealthMonitor, HealthReport, HealthStatus, ReadinessStatus};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingestion error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] verse_indexer_pipeline::IngestError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] verse_indexer_repository::SearchIndexError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
