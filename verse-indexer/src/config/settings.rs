//! Environment-driven settings.

use std::env;
use std::time::Duration;

use verse_indexer_repository::NgramCoverage;

use crate::IndexerError;

/// Default content API base URL.
const DEFAULT_CONTENT_API_URL: &str = "https://web-api.qurankemenag.net";

/// Default index path.
const DEFAULT_INDEX_PATH: &str = "verse-index";

/// Default reindex run deadline, in seconds.
const DEFAULT_REINDEX_DEADLINE_SECS: u64 = 1800;

/// Runtime settings for the indexer.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the upstream content API.
    pub content_api_url: String,
    /// Filesystem path of the search index.
    pub index_path: String,
    /// Overall deadline for one reindex run.
    pub reindex_deadline: Duration,
    /// N-gram shadow coverage for the searchable fields.
    pub ngram_coverage: NgramCoverage,
    /// Whether to run a full reindex at startup.
    pub reindex_on_start: bool,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CONTENT_API_URL`: content API base URL (default: the upstream host)
    /// - `SEARCH_INDEX_PATH`: index directory (default: `verse-index`)
    /// - `REINDEX_DEADLINE_SECS`: run deadline in seconds (default: 1800)
    /// - `NGRAM_COVERAGE`: `all` or `primary` (default: `all`)
    /// - `REINDEX_ON_START`: `true`/`1` to reindex at startup (default: off)
    pub fn from_env() -> Result<Self, IndexerError> {
        let content_api_url =
            env::var("CONTENT_API_URL").unwrap_or_else(|_| DEFAULT_CONTENT_API_URL.to_string());
        let index_path =
            env::var("SEARCH_INDEX_PATH").unwrap_or_else(|_| DEFAULT_INDEX_PATH.to_string());

        let deadline_secs = match env::var("REINDEX_DEADLINE_SECS") {
            Ok(value) => value.parse::<u64>().map_err(|_| {
                IndexerError::config(format!("invalid REINDEX_DEADLINE_SECS: {value}"))
            })?,
            Err(_) => DEFAULT_REINDEX_DEADLINE_SECS,
        };

        let ngram_coverage = match env::var("NGRAM_COVERAGE") {
            Ok(value) => NgramCoverage::parse(&value)
                .ok_or_else(|| IndexerError::config(format!("invalid NGRAM_COVERAGE: {value}")))?,
            Err(_) => NgramCoverage::default(),
        };

        let reindex_on_start = matches!(
            env::var("REINDEX_ON_START").as_deref(),
            Ok("true") | Ok("1")
        );

        Ok(Self {
            content_api_url,
            index_path,
            reindex_deadline: Duration::from_secs(deadline_secs),
            ngram_coverage,
            reindex_on_start,
        })
    }
}
