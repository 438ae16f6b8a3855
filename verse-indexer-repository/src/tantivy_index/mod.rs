//! Tantivy implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! backed by a persistent tantivy index.

mod queries;
mod schema;
mod store;

pub use schema::{IndexConfig, NgramCoverage};
pub use store::TantivyIndexStore;
