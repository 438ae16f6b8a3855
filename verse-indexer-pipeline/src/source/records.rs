//! Content source trait and record types.

use async_trait::async_trait;

use crate::errors::SourceError;

/// One verse record as supplied by the content provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    /// Provider-global record id, used to fetch the verse's commentary.
    pub record_id: u64,
    /// Chapter the verse belongs to.
    pub chapter_number: u32,
    /// Verse number within the chapter.
    pub verse_number: u32,
    /// Original-script text.
    pub original_text: String,
    /// Latin transliteration.
    pub transliterated_text: String,
    /// Translated text.
    pub translated_text: String,
}

/// Commentary supplied for a single verse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseCommentary {
    /// The main commentary text.
    pub main_commentary: String,
    /// Thematic topic tag.
    pub topic_tag: String,
}

/// Abstract interface over the upstream content provider.
///
/// Each call carries its own short per-call timeout, independent of the
/// overall reindex deadline. Retry policy is owned by the orchestrator, not
/// the source.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the verse records of one chapter partition.
    ///
    /// # Arguments
    ///
    /// * `chapter_id` - The partition to fetch (1-114)
    /// * `offset` - Record offset within the chapter
    /// * `limit` - Maximum records to return
    async fn get_chapter_verses(
        &self,
        chapter_id: u32,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<VerseRecord>, SourceError>;

    /// Fetch the commentary for one verse, keyed by its provider record id.
    async fn get_verse_commentary(&self, record_id: u64)
        -> Result<VerseCommentary, SourceError>;
}
