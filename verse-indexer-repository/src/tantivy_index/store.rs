//! Tantivy index store implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! backed by a persistent tantivy index on disk.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::Query;
use tantivy::schema::{Schema, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tracing::{debug, info, warn};

use super::queries::{build_fuzzy_query, build_primary_query};
use super::schema::{
    build_schema, register_tokenizers, resolve_fields, IndexConfig, NgramCoverage, VerseFields,
};
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use verse_indexer_shared::{SearchHit, SearchRequest, SearchResponse, VerseDocument};

/// Memory budget for the index writer, in bytes.
const WRITER_MEMORY_BUDGET: usize = 50_000_000;

/// Tantivy-backed search index store.
///
/// Opens (or creates) a persistent index at a configured path. A corrupt
/// index that fails to open is deleted and recreated; this is a deliberate,
/// logged, lossy recovery path. The single writer sits behind a mutex while
/// the reader serves concurrent searches, so queries may observe a reindex
/// mid-flight.
pub struct TantivyIndexStore {
    index: Index,
    writer: Mutex<IndexWriter>,
    reader: IndexReader,
    fields: VerseFields,
    config: IndexConfig,
}

impl TantivyIndexStore {
    /// Open the index at `path`, creating it when absent.
    ///
    /// When an existing index fails to open (corruption, schema drift), the
    /// directory is removed and a fresh index is created in its place.
    pub fn open(path: impl AsRef<Path>, config: IndexConfig) -> Result<Self, SearchIndexError> {
        let path = path.as_ref();
        let schema = build_schema();

        let index = match Self::open_at(path, schema.clone()) {
            Ok(index) => index,
            Err(open_err) => {
                warn!(
                    path = %path.display(),
                    error = %open_err,
                    "failed to open existing index, deleting and recreating"
                );
                fs::remove_dir_all(path).map_err(|e| {
                    SearchIndexError::corruption(format!(
                        "failed to remove corrupt index at {}: {e}",
                        path.display()
                    ))
                })?;
                Self::open_at(path, schema.clone()).map_err(|e| {
                    SearchIndexError::corruption(format!(
                        "failed to recreate index at {}: {e}",
                        path.display()
                    ))
                })?
            }
        };

        let store = Self::from_index(index, config)?;
        info!(
            path = %path.display(),
            doc_count = store.reader.searcher().num_docs(),
            "opened search index"
        );
        Ok(store)
    }

    /// Create a transient in-memory index. Intended for tests and demos.
    pub fn create_in_memory(config: IndexConfig) -> Result<Self, SearchIndexError> {
        let index = Index::create_in_ram(build_schema());
        Self::from_index(index, config)
    }

    fn open_at(path: &Path, schema: Schema) -> Result<Index, SearchIndexError> {
        fs::create_dir_all(path).map_err(|e| SearchIndexError::open(e.to_string()))?;
        let dir = MmapDirectory::open(path).map_err(|e| SearchIndexError::open(e.to_string()))?;
        Index::open_or_create(dir, schema).map_err(|e| SearchIndexError::open(e.to_string()))
    }

    fn from_index(index: Index, config: IndexConfig) -> Result<Self, SearchIndexError> {
        register_tokenizers(&index)?;
        let schema = index.schema();
        let fields = resolve_fields(&schema)?;

        let writer = index
            .writer(WRITER_MEMORY_BUDGET)
            .map_err(|e| SearchIndexError::open(e.to_string()))?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e: tantivy::TantivyError| SearchIndexError::open(e.to_string()))?;

        Ok(Self {
            index,
            writer: Mutex::new(writer),
            reader,
            fields,
            config,
        })
    }

    /// Stage one batch: delete-by-id plus add, for every document.
    fn stage_batch(
        writer: &IndexWriter,
        fields: &VerseFields,
        config: &IndexConfig,
        documents: &[VerseDocument],
    ) -> Result<(), SearchIndexError> {
        for doc in documents {
            let id = doc.doc_id();
            writer.delete_term(tantivy::Term::from_field_text(fields.id, &id));

            let mut indexed = TantivyDocument::default();
            indexed.add_text(fields.id, &id);
            indexed.add_u64(fields.chapter_number, u64::from(doc.chapter_number));
            indexed.add_u64(fields.verse_number, u64::from(doc.verse_number));
            indexed.add_u64(fields.indexed_at, doc.indexed_at.timestamp().max(0) as u64);

            if let Some(text) = &doc.original_text {
                indexed.add_text(fields.original_text, text);
            }
            if let Some(text) = &doc.transliterated_text {
                indexed.add_text(fields.transliterated_text, text);
                indexed.add_text(fields.transliterated_ngram, text);
            }
            if let Some(text) = &doc.translated_text {
                indexed.add_text(fields.translated_text, text);
                indexed.add_text(fields.translated_ngram, text);
            }

            // Commentary and topic shadows are populated only under full
            // n-gram coverage; the exact fields are always indexed.
            let all_coverage = config.ngram_coverage == NgramCoverage::All;
            if let Some(text) = &doc.commentary_text {
                indexed.add_text(fields.commentary_text, text);
                if all_coverage {
                    indexed.add_text(fields.commentary_ngram, text);
                }
            }
            if let Some(text) = &doc.topic_tag {
                indexed.add_text(fields.topic_tag, text);
                if all_coverage {
                    indexed.add_text(fields.topic_ngram, text);
                }
            }

            writer
                .add_document(indexed)
                .map_err(|e| SearchIndexError::write(e.to_string()))?;
        }
        Ok(())
    }

    /// Run a query and bind the requested page of hits.
    fn execute_query(
        &self,
        query: &dyn Query,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<SearchHit>, u64), SearchIndexError> {
        let searcher = self.reader.searcher();
        let collector = (TopDocs::with_limit(limit).and_offset(offset), Count);
        let (top_docs, total) = searcher
            .search(query, &collector)
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(address)
                .map_err(|e| SearchIndexError::query(e.to_string()))?;
            if let Some(hit) = self.bind_hit(&doc, score) {
                hits.push(hit);
            }
        }
        Ok((hits, total as u64))
    }

    /// Typed extraction of a hit from its stored fields.
    ///
    /// When the projected fields are unexpectedly absent the hit is
    /// synthesized from the `"chapter:verse"` document id and flagged as
    /// degraded. The hit is dropped only when the id itself does not parse
    /// into two positive integers.
    fn bind_hit(&self, doc: &TantivyDocument, score: f32) -> Option<SearchHit> {
        let stored_text = |field| {
            doc.get_first(field)
                .and_then(|value| value.as_str())
                .map(str::to_string)
        };

        let chapter = doc
            .get_first(self.fields.chapter_number)
            .and_then(|value| value.as_u64());
        let verse = doc
            .get_first(self.fields.verse_number)
            .and_then(|value| value.as_u64());

        match (chapter, verse) {
            (Some(chapter), Some(verse)) if chapter > 0 && verse > 0 => Some(SearchHit {
                chapter_number: chapter as u32,
                verse_number: verse as u32,
                original_text: stored_text(self.fields.original_text),
                transliterated_text: stored_text(self.fields.transliterated_text),
                translated_text: stored_text(self.fields.translated_text),
                commentary_text: stored_text(self.fields.commentary_text),
                topic_tag: stored_text(self.fields.topic_tag),
                score,
                degraded: false,
            }),
            _ => {
                let id = doc
                    .get_first(self.fields.id)
                    .and_then(|value| value.as_str());
                match id.and_then(VerseDocument::parse_doc_id) {
                    Some((chapter, verse)) => {
                        warn!(
                            id = id.unwrap_or_default(),
                            "hit has no projected fields, synthesizing minimal result from id"
                        );
                        Some(SearchHit::minimal(chapter, verse, score))
                    }
                    None => {
                        warn!(id = id.unwrap_or_default(), "dropping hit with unparseable id");
                        None
                    }
                }
            }
        }
    }
}

#[async_trait]
impl SearchIndexProvider for TantivyIndexStore {
    async fn batch_upsert(&self, documents: &[VerseDocument]) -> Result<(), SearchIndexError> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut writer = self.writer.lock();
        if let Err(e) = Self::stage_batch(&writer, &self.fields, &self.config, documents) {
            let _ = writer.rollback();
            return Err(e);
        }
        if let Err(e) = writer.commit() {
            let _ = writer.rollback();
            return Err(SearchIndexError::write(e.to_string()));
        }
        drop(writer);

        self.reader
            .reload()
            .map_err(|e| SearchIndexError::write(e.to_string()))?;
        debug!(count = documents.len(), "committed document batch");
        Ok(())
    }

    async fn count(&self) -> Result<u64, SearchIndexError> {
        Ok(self.reader.searcher().num_docs())
    }

    async fn health_probe(&self) -> bool {
        self.count().await.is_ok()
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchIndexError> {
        let page = request.effective_page();
        let limit = request.effective_limit();
        let offset = request.offset();

        let primary = build_primary_query(
            &self.index,
            &self.fields,
            self.config.ngram_coverage,
            &request.query,
        )?;
        let (hits, total) = self.execute_query(primary.as_ref(), limit, offset)?;

        // One transparent fuzzy pass when the primary disjunction matched
        // nothing; the original empty page stands if fuzzy is also empty.
        if total == 0 {
            let fuzzy = build_fuzzy_query(&self.index, &self.fields, &request.query)?;
            let (fuzzy_hits, fuzzy_total) = self.execute_query(fuzzy.as_ref(), limit, offset)?;
            if fuzzy_total > 0 {
                debug!(
                    query = %request.query,
                    total = fuzzy_total,
                    "primary query empty, returning fuzzy fallback results"
                );
                return Ok(SearchResponse {
                    hits: fuzzy_hits,
                    total: fuzzy_total,
                    page,
                    limit,
                });
            }
        }

        Ok(SearchResponse {
            hits,
            total,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TantivyIndexStore {
        TantivyIndexStore::create_in_memory(IndexConfig::default()).unwrap()
    }

    fn translated_doc(chapter: u32, verse: u32, text: &str) -> VerseDocument {
        VerseDocument::new(chapter, verse).with_translated_text(text)
    }

    #[tokio::test]
    async fn test_search_single_translation_match() {
        let store = store();
        store
            .batch_upsert(&[translated_doc(
                1,
                1,
                "In the name of Allah, the Merciful",
            )])
            .await
            .unwrap();

        let response = store
            .search(&SearchRequest::new("Allah", 1, 10))
            .await
            .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].chapter_number, 1);
        assert_eq!(response.hits[0].verse_number, 1);
        assert!(!response.hits[0].degraded);
    }

    #[tokio::test]
    async fn test_exact_match_outranks_ngram_only_match() {
        let store = store();
        store
            .batch_upsert(&[
                translated_doc(2, 1, "merciful"),
                translated_doc(1, 1, "mercy"),
            ])
            .await
            .unwrap();

        let response = store
            .search(&SearchRequest::new("mercy", 1, 10))
            .await
            .unwrap();

        // "merciful" only matches through shared n-grams; the whole-term
        // match must rank first.
        assert_eq!(response.total, 2);
        assert_eq!(response.hits[0].chapter_number, 1);
        assert!(response.hits[0].score > response.hits[1].score);
    }

    #[tokio::test]
    async fn test_fuzzy_fallback_on_zero_primary_hits() {
        let store = store();
        store
            .batch_upsert(&[translated_doc(1, 6, "the straight path")])
            .await
            .unwrap();

        // "tho" shares no 3-gram with the document and no exact term, but is
        // within edit distance 1 of "the".
        let response = store
            .search(&SearchRequest::new("tho", 1, 10))
            .await
            .unwrap();

        assert_eq!(response.total, 1);
        assert_eq!(response.hits[0].verse_number, 6);
    }

    #[tokio::test]
    async fn test_no_match_returns_empty_without_error() {
        let store = store();
        store
            .batch_upsert(&[translated_doc(
                1,
                1,
                "In the name of Allah, the Merciful",
            )])
            .await
            .unwrap();

        let response = store
            .search(&SearchRequest::new("zzzxyz123", 1, 10))
            .await
            .unwrap();

        assert_eq!(response.total, 0);
        assert!(response.hits.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let store = store();
        let docs: Vec<VerseDocument> = (1..=15)
            .map(|verse| translated_doc(24, verse, "light upon light"))
            .collect();
        store.batch_upsert(&docs).await.unwrap();

        let first = store
            .search(&SearchRequest::new("light", 1, 10))
            .await
            .unwrap();
        assert_eq!(first.total, 15);
        assert_eq!(first.hits.len(), 10);

        let second = store
            .search(&SearchRequest::new("light", 2, 10))
            .await
            .unwrap();
        assert_eq!(second.total, 15);
        assert_eq!(second.hits.len(), 5);
        assert!(second.hits.len() <= second.limit);
        assert!(second.total >= second.hits.len() as u64);
    }

    #[tokio::test]
    async fn test_batch_upsert_is_idempotent() {
        let store = store();
        let docs = vec![
            translated_doc(1, 1, "first verse"),
            translated_doc(1, 2, "second verse"),
        ];

        store.batch_upsert(&docs).await.unwrap();
        store.batch_upsert(&docs).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_count_and_health_probe() {
        let store = store();
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.health_probe().await);

        store
            .batch_upsert(&[translated_doc(1, 1, "a verse")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_primary_coverage_skips_commentary_ngram() {
        let config = IndexConfig {
            ngram_coverage: NgramCoverage::Primary,
        };
        let primary_store = TantivyIndexStore::create_in_memory(config).unwrap();
        let all_store = store();

        let doc = VerseDocument::new(2, 153).with_commentary_text("patience brings relief");
        primary_store.batch_upsert(&[doc.clone()]).await.unwrap();
        all_store.batch_upsert(&[doc]).await.unwrap();

        // "tience" is a substring of "patience": reachable through the
        // commentary n-gram shadow, too far for the fuzzy fallback.
        let request = SearchRequest::new("tience", 1, 10);
        assert!(all_store.search(&request).await.unwrap().total > 0);
        assert_eq!(primary_store.search(&request).await.unwrap().total, 0);
    }

    #[test]
    fn test_bind_hit_synthesizes_minimal_from_id() {
        let store = store();
        let mut doc = TantivyDocument::default();
        doc.add_text(store.fields.id, "3:7");

        let hit = store.bind_hit(&doc, 1.5).unwrap();
        assert_eq!(hit.chapter_number, 3);
        assert_eq!(hit.verse_number, 7);
        assert!(hit.degraded);
        assert!(hit.translated_text.is_none());
    }

    #[test]
    fn test_bind_hit_drops_unparseable_id() {
        let store = store();
        let mut doc = TantivyDocument::default();
        doc.add_text(store.fields.id, "not-a-key");

        assert!(store.bind_hit(&doc, 1.0).is_none());
    }

    #[tokio::test]
    async fn test_open_creates_and_reopen_preserves_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verse-index");

        {
            let store = TantivyIndexStore::open(&path, IndexConfig::default()).unwrap();
            store
                .batch_upsert(&[translated_doc(1, 1, "a verse")])
                .await
                .unwrap();
        }

        let reopened = TantivyIndexStore::open(&path, IndexConfig::default()).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_open_recreates_corrupt_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("verse-index");
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("meta.json"), b"{ this is not an index }").unwrap();

        let store = TantivyIndexStore::open(&path, IndexConfig::default()).unwrap();
        assert_eq!(store.count().await.unwrap(), 0);

        store
            .batch_upsert(&[translated_doc(1, 1, "recovered")])
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
