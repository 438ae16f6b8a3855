//! HTTP implementation of the content source.
//!
//! Fetches chapter partitions and per-verse commentary from the upstream
//! content API. Every request carries a fixed short timeout and the headers
//! the upstream expects.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::records::{ContentSource, VerseCommentary, VerseRecord};
use crate::errors::SourceError;

/// Per-call request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Origin header value the upstream content API expects.
const UPSTREAM_ORIGIN: &str = "https://quran.kemenag.go.id";

/// Configuration for the HTTP content source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the content API.
    pub base_url: String,
}

/// HTTP client for the upstream content provider.
pub struct HttpContentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpContentSource {
    /// Create a new content source client.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        info!(base_url = %config.base_url, "Created content source client");

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, SourceError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("Origin", UPSTREAM_ORIGIN)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        debug!(path = %path, status = status.as_u16(), "Fetched from content API");

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::decode(e.to_string()))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn get_chapter_verses(
        &self,
        chapter_id: u32,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<VerseRecord>, SourceError> {
        let path = format!("quran-ayah?surah={chapter_id}&start={offset}&limit={limit}");
        let envelope: ChapterVersesEnvelope = self.fetch_json(&path).await?;
        Ok(envelope.data.into_iter().map(VerseRecord::from).collect())
    }

    async fn get_verse_commentary(
        &self,
        record_id: u64,
    ) -> Result<VerseCommentary, SourceError> {
        let path = format!("quran-tafsir/{record_id}");
        let envelope: CommentaryEnvelope = self.fetch_json(&path).await?;
        Ok(envelope.data.into())
    }
}

/// Payload of the chapter verses endpoint.
#[derive(Debug, Deserialize)]
struct ChapterVersesEnvelope {
    #[serde(default)]
    data: Vec<VerseRecordDto>,
}

#[derive(Debug, Deserialize)]
struct VerseRecordDto {
    id: u64,
    surah_id: u32,
    ayah: u32,
    #[serde(default)]
    arabic: String,
    #[serde(default)]
    latin: String,
    #[serde(default)]
    translation: String,
}

impl From<VerseRecordDto> for VerseRecord {
    fn from(dto: VerseRecordDto) -> Self {
        Self {
            record_id: dto.id,
            chapter_number: dto.surah_id,
            verse_number: dto.ayah,
            original_text: dto.arabic,
            transliterated_text: dto.latin,
            translated_text: dto.translation,
        }
    }
}

/// Payload of the commentary endpoint.
#[derive(Debug, Deserialize)]
struct CommentaryEnvelope {
    data: CommentaryDto,
}

#[derive(Debug, Default, Deserialize)]
struct CommentaryDto {
    #[serde(default)]
    tafsir: TafsirDto,
}

#[derive(Debug, Default, Deserialize)]
struct TafsirDto {
    #[serde(default)]
    tahlili: String,
    #[serde(default)]
    theme_group: String,
}

impl From<CommentaryDto> for VerseCommentary {
    fn from(dto: CommentaryDto) -> Self {
        Self {
            main_commentary: dto.tafsir.tahlili,
            topic_tag: dto.tafsir.theme_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_chapter_verses_payload() {
        let body = r#"{
            "data": [
                {
                    "id": 262,
                    "surah_id": 2,
                    "ayah": 255,
                    "arabic": "...",
                    "latin": "allahu la ilaha illa huwa",
                    "translation": "Allah - there is no deity except Him"
                }
            ]
        }"#;

        let envelope: ChapterVersesEnvelope = serde_json::from_str(body).unwrap();
        let records: Vec<VerseRecord> =
            envelope.data.into_iter().map(VerseRecord::from).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record_id, 262);
        assert_eq!(records[0].chapter_number, 2);
        assert_eq!(records[0].verse_number, 255);
        assert!(records[0].translated_text.starts_with("Allah"));
    }

    #[test]
    fn test_decode_commentary_payload_with_missing_fields() {
        let body = r#"{
            "data": {
                "tafsir": {
                    "tahlili": "An extended commentary."
                }
            }
        }"#;

        let envelope: CommentaryEnvelope = serde_json::from_str(body).unwrap();
        let commentary = VerseCommentary::from(envelope.data);

        assert_eq!(commentary.main_commentary, "An extended commentary.");
        assert!(commentary.topic_tag.is_empty());
    }

    #[test]
    fn test_decode_empty_data_array() {
        let envelope: ChapterVersesEnvelope = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(envelope.data.is_empty());
    }
}
