//! Verse processor implementation.
//!
//! Transforms upstream verse records into documents ready for indexing.

use tracing::warn;

use crate::source::{VerseCommentary, VerseRecord};
use verse_indexer_shared::VerseDocument;

/// Processor that turns fetched records into verse documents.
///
/// A record with a non-positive chapter or verse number is malformed and is
/// skipped with a warning rather than failing the run. Empty text fields are
/// left out of the document instead of being indexed as empty strings.
pub struct VerseProcessor;

impl VerseProcessor {
    /// Create a new processor.
    pub fn new() -> Self {
        Self
    }

    /// Check that a record carries a usable identity.
    pub fn is_valid(&self, record: &VerseRecord) -> bool {
        if record.chapter_number == 0 || record.verse_number == 0 {
            warn!(
                record_id = record.record_id,
                chapter = record.chapter_number,
                verse = record.verse_number,
                "skipping record with invalid identity"
            );
            return false;
        }
        true
    }

    /// Build an indexable document from a record and its optional commentary.
    pub fn to_document(
        &self,
        record: VerseRecord,
        commentary: Option<VerseCommentary>,
    ) -> VerseDocument {
        let mut doc = VerseDocument::new(record.chapter_number, record.verse_number);

        if !record.original_text.is_empty() {
            doc = doc.with_original_text(record.original_text);
        }
        if !record.transliterated_text.is_empty() {
            doc = doc.with_transliterated_text(record.transliterated_text);
        }
        if !record.translated_text.is_empty() {
            doc = doc.with_translated_text(record.translated_text);
        }

        if let Some(commentary) = commentary {
            if !commentary.main_commentary.is_empty() {
                doc = doc.with_commentary_text(commentary.main_commentary);
            }
            if !commentary.topic_tag.is_empty() {
                doc = doc.with_topic_tag(commentary.topic_tag);
            }
        }

        doc
    }
}

impl Default for VerseProcessor {
    fn default() -> Self {
        Self::new()
    }
}
