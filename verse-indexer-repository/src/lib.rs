//! # Verse Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! verse search index. It includes definitions for errors, interfaces, and a
//! concrete implementation backed by tantivy.

pub mod errors;
pub mod interfaces;
pub mod tantivy_index;

pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use tantivy_index::{IndexConfig, NgramCoverage, TantivyIndexStore};
