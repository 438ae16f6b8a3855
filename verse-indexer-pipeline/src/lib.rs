//! # Verse Indexer Pipeline
//!
//! This crate provides the ingestion pipeline that fetches the verse corpus
//! from the upstream content provider and indexes it into the search index.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Fetches chapter partitions and per-verse commentary over HTTP
//! 2. **Processor**: Validates records and builds verse documents
//! 3. **Loader**: Buffers documents and flushes batches into the index
//! 4. **Orchestrator**: Runs a full reindex with retries, a deadline and a
//!    concurrency guard

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use errors::{IngestError, SourceError};
pub use orchestrator::{OrchestratorConfig, ReindexOrchestrator, ReindexSummary, TriggerOutcome};
