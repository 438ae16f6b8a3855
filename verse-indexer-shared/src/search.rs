//! Search request and response types.
//!
//! These types form the query-side contract between the index store and the
//! outer HTTP layer: a paginated request in, a ranked page of hits plus the
//! total match count out.

use serde::{Deserialize, Serialize};

/// Page size applied when the requested limit is unset or invalid.
pub const DEFAULT_LIMIT: usize = 10;

/// Hard upper bound on the page size.
pub const MAX_LIMIT: usize = 100;

/// A paginated full-text search request.
///
/// `page` is 1-based; `limit` is clamped to `[1, MAX_LIMIT]`. The raw values
/// are kept as received and normalized through the accessor methods, so the
/// clamping rules live in exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The query text.
    pub query: String,
    /// Requested page, 1-based. Zero is treated as page 1.
    pub page: usize,
    /// Requested page size. Zero falls back to `DEFAULT_LIMIT`.
    pub limit: usize,
}

impl SearchRequest {
    /// Create a request with explicit pagination.
    pub fn new(query: impl Into<String>, page: usize, limit: usize) -> Self {
        Self {
            query: query.into(),
            page,
            limit,
        }
    }

    /// Create a request with default pagination (first page, default limit).
    pub fn query(query: impl Into<String>) -> Self {
        Self::new(query, 1, DEFAULT_LIMIT)
    }

    /// The effective page: at least 1.
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    /// The effective limit: `DEFAULT_LIMIT` when unset, capped at `MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        match self.limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_LIMIT),
        }
    }

    /// The result offset implied by the effective page and limit.
    pub fn offset(&self) -> usize {
        (self.effective_page() - 1) * self.effective_limit()
    }
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Chapter number of the matched verse.
    pub chapter_number: u32,
    /// Verse number of the matched verse.
    pub verse_number: u32,
    /// Original-script text, when projected from the index.
    pub original_text: Option<String>,
    /// Latin transliteration, when projected from the index.
    pub transliterated_text: Option<String>,
    /// Translated text, when projected from the index.
    pub translated_text: Option<String>,
    /// Commentary, when projected from the index.
    pub commentary_text: Option<String>,
    /// Topic tag, when projected from the index.
    pub topic_tag: Option<String>,
    /// Relevance score assigned by the index.
    pub score: f32,
    /// True when the hit was synthesized from the document id because the
    /// projected fields were unexpectedly absent.
    pub degraded: bool,
}

impl SearchHit {
    /// Build a minimal hit from a parsed document id.
    ///
    /// Used when a hit's stored fields are missing; the text fields stay
    /// empty and the hit is flagged as degraded rather than dropped.
    pub fn minimal(chapter_number: u32, verse_number: u32, score: f32) -> Self {
        Self {
            chapter_number,
            verse_number,
            original_text: None,
            transliterated_text: None,
            translated_text: None,
            commentary_text: None,
            topic_tag: None,
            score,
            degraded: true,
        }
    }
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The hits on this page, ranked by score.
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents across all pages.
    pub total: u64,
    /// Effective page this response covers.
    pub page: usize,
    /// Effective page size.
    pub limit: usize,
}

impl SearchResponse {
    /// An empty result page.
    pub fn empty(page: usize, limit: usize) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_defaults_when_zero() {
        let request = SearchRequest::new("mercy", 1, 0);
        assert_eq!(request.effective_limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let request = SearchRequest::new("mercy", 1, 5000);
        assert_eq!(request.effective_limit(), MAX_LIMIT);
    }

    #[test]
    fn test_page_zero_treated_as_first() {
        let request = SearchRequest::new("mercy", 0, 10);
        assert_eq!(request.effective_page(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_uses_effective_values() {
        let request = SearchRequest::new("mercy", 3, 25);
        assert_eq!(request.offset(), 50);

        let clamped = SearchRequest::new("mercy", 2, 500);
        assert_eq!(clamped.offset(), MAX_LIMIT);
    }

    #[test]
    fn test_minimal_hit_is_degraded() {
        let hit = SearchHit::minimal(3, 7, 0.5);
        assert_eq!(hit.chapter_number, 3);
        assert_eq!(hit.verse_number, 7);
        assert!(hit.degraded);
        assert!(hit.translated_text.is_none());
    }
}
