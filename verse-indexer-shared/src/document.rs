//! Verse document model.
//!
//! One document per verse, identified by its chapter and verse numbers.
//! The composite key `"chapter:verse"` is unique within the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single indexed verse.
///
/// Documents are created in bulk during a reindex run and replaced wholesale
/// on the next run; they are never partially mutated outside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseDocument {
    /// Chapter number (1-114).
    pub chapter_number: u32,
    /// Verse number within the chapter (>= 1).
    pub verse_number: u32,
    /// Original-script text of the verse.
    pub original_text: Option<String>,
    /// Latin transliteration.
    pub transliterated_text: Option<String>,
    /// Translated text.
    pub translated_text: Option<String>,
    /// Commentary on the verse.
    pub commentary_text: Option<String>,
    /// Thematic topic tag.
    pub topic_tag: Option<String>,
    /// When this document was built for indexing.
    pub indexed_at: DateTime<Utc>,
}

impl VerseDocument {
    /// Create a new document with the given identity, stamping `indexed_at`.
    pub fn new(chapter_number: u32, verse_number: u32) -> Self {
        Self {
            chapter_number,
            verse_number,
            original_text: None,
            transliterated_text: None,
            translated_text: None,
            commentary_text: None,
            topic_tag: None,
            indexed_at: Utc::now(),
        }
    }

    /// Set the original-script text.
    pub fn with_original_text(mut self, text: impl Into<String>) -> Self {
        self.original_text = Some(text.into());
        self
    }

    /// Set the transliteration.
    pub fn with_transliterated_text(mut self, text: impl Into<String>) -> Self {
        self.transliterated_text = Some(text.into());
        self
    }

    /// Set the translation.
    pub fn with_translated_text(mut self, text: impl Into<String>) -> Self {
        self.translated_text = Some(text.into());
        self
    }

    /// Set the commentary text.
    pub fn with_commentary_text(mut self, text: impl Into<String>) -> Self {
        self.commentary_text = Some(text.into());
        self
    }

    /// Set the topic tag.
    pub fn with_topic_tag(mut self, tag: impl Into<String>) -> Self {
        self.topic_tag = Some(tag.into());
        self
    }

    /// The unique document key, formatted as `"chapter:verse"`.
    pub fn doc_id(&self) -> String {
        format!("{}:{}", self.chapter_number, self.verse_number)
    }

    /// Parse a `"chapter:verse"` document key back into its two components.
    ///
    /// Returns `None` unless both parts parse as positive integers.
    pub fn parse_doc_id(id: &str) -> Option<(u32, u32)> {
        let (chapter, verse) = id.split_once(':')?;
        let chapter: u32 = chapter.parse().ok()?;
        let verse: u32 = verse.parse().ok()?;
        if chapter == 0 || verse == 0 {
            return None;
        }
        Some((chapter, verse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_format() {
        let doc = VerseDocument::new(2, 255);
        assert_eq!(doc.doc_id(), "2:255");
    }

    #[test]
    fn test_parse_doc_id_round_trip() {
        let doc = VerseDocument::new(114, 6);
        assert_eq!(VerseDocument::parse_doc_id(&doc.doc_id()), Some((114, 6)));
    }

    #[test]
    fn test_parse_doc_id_rejects_malformed() {
        assert_eq!(VerseDocument::parse_doc_id("1"), None);
        assert_eq!(VerseDocument::parse_doc_id("1:"), None);
        assert_eq!(VerseDocument::parse_doc_id("a:b"), None);
        assert_eq!(VerseDocument::parse_doc_id("0:1"), None);
        assert_eq!(VerseDocument::parse_doc_id("1:0"), None);
        assert_eq!(VerseDocument::parse_doc_id("-1:2"), None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let doc = VerseDocument::new(1, 1)
            .with_translated_text("In the name of Allah")
            .with_topic_tag("opening");

        assert_eq!(
            doc.translated_text.as_deref(),
            Some("In the name of Allah")
        );
        assert_eq!(doc.topic_tag.as_deref(), Some("opening"));
        assert!(doc.commentary_text.is_none());
    }
}
