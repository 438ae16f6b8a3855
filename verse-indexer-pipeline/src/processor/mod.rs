//! Processor module for the verse indexer pipeline.
//!
//! Validates upstream records and builds verse documents.

mod verse_processor;

pub use verse_processor::VerseProcessor;
