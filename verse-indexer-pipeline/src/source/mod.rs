//! Content source module for the verse indexer pipeline.
//!
//! Provides the upstream content provider abstraction and its HTTP
//! implementation.

mod http_source;
mod records;

pub use http_source::{HttpContentSource, SourceConfig};
pub use records::{ContentSource, VerseCommentary, VerseRecord};
