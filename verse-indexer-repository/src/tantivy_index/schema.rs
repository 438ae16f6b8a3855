//! Index schema, analyzers and field boosts.
//!
//! Every searchable text field is indexed twice: once under the default
//! tokenizer for whole-term matching, and once in an unstored `*_ngram`
//! shadow field under a 3-4 character n-gram tokenizer for partial-substring
//! matching without wildcard scans. All shadow fields exist in the schema
//! regardless of the configured coverage; coverage controls which shadows
//! are populated and queried, so changing it never invalidates an index.

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, FAST, INDEXED, STORED,
    STRING, TEXT,
};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, TextAnalyzer};
use tantivy::Index;

use crate::errors::SearchIndexError;

/// Name the n-gram analyzer is registered under.
pub const NGRAM_TOKENIZER: &str = "ngram3_4";

/// Minimum n-gram length.
const NGRAM_MIN: usize = 3;

/// Maximum n-gram length.
const NGRAM_MAX: usize = 4;

/// Exact-field boosts, field-importance-ordered: translation and
/// transliteration carry the most weight, then topic, then commentary.
pub const BOOST_TRANSLATED: f32 = 5.0;
pub const BOOST_TRANSLITERATED: f32 = 5.0;
pub const BOOST_TOPIC: f32 = 4.0;
pub const BOOST_COMMENTARY: f32 = 3.0;

/// N-gram boosts sit at one fifth of their exact-field counterpart, so a
/// whole-term hit always outranks a partial-substring hit at equal term
/// frequency.
pub const NGRAM_BOOST_RATIO: f32 = 0.2;

/// Which searchable fields carry a populated n-gram shadow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NgramCoverage {
    /// All four searchable text fields.
    #[default]
    All,
    /// Translation and transliteration only.
    Primary,
}

impl NgramCoverage {
    /// Parse a configuration string (`"all"` or `"primary"`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "primary" => Some(Self::Primary),
            _ => None,
        }
    }
}

/// Configuration for building and querying the verse index.
#[derive(Debug, Clone, Default)]
pub struct IndexConfig {
    /// N-gram shadow coverage for the searchable fields.
    pub ngram_coverage: NgramCoverage,
}

/// Resolved field handles for the verse schema.
#[derive(Debug, Clone, Copy)]
pub struct VerseFields {
    pub id: Field,
    pub chapter_number: Field,
    pub verse_number: Field,
    pub indexed_at: Field,
    pub original_text: Field,
    pub transliterated_text: Field,
    pub translated_text: Field,
    pub commentary_text: Field,
    pub topic_tag: Field,
    pub transliterated_ngram: Field,
    pub translated_ngram: Field,
    pub commentary_ngram: Field,
    pub topic_ngram: Field,
}

impl VerseFields {
    /// The searchable exact fields with their boosts, importance-ordered.
    pub fn searchable_exact(&self) -> [(Field, f32); 4] {
        [
            (self.translated_text, BOOST_TRANSLATED),
            (self.transliterated_text, BOOST_TRANSLITERATED),
            (self.topic_tag, BOOST_TOPIC),
            (self.commentary_text, BOOST_COMMENTARY),
        ]
    }

    /// The n-gram shadow fields queried (and populated) under the given
    /// coverage, each at one fifth of its exact-field boost.
    pub fn searchable_ngram(&self, coverage: NgramCoverage) -> Vec<(Field, f32)> {
        let mut fields = vec![
            (self.translated_ngram, BOOST_TRANSLATED * NGRAM_BOOST_RATIO),
            (
                self.transliterated_ngram,
                BOOST_TRANSLITERATED * NGRAM_BOOST_RATIO,
            ),
        ];
        if coverage == NgramCoverage::All {
            fields.push((self.topic_ngram, BOOST_TOPIC * NGRAM_BOOST_RATIO));
            fields.push((self.commentary_ngram, BOOST_COMMENTARY * NGRAM_BOOST_RATIO));
        }
        fields
    }

    /// Fields probed by the fuzzy fallback query: the primary text fields.
    pub fn fuzzy_fields(&self) -> [Field; 3] {
        [self.translated_text, self.commentary_text, self.topic_tag]
    }
}

/// Build the verse schema.
pub fn build_schema() -> Schema {
    let mut builder = Schema::builder();

    let ngram_indexing = TextFieldIndexing::default()
        .set_tokenizer(NGRAM_TOKENIZER)
        .set_index_option(IndexRecordOption::WithFreqs);
    let ngram_options = TextOptions::default().set_indexing_options(ngram_indexing);

    // Identity: the "chapter:verse" key is the delete-term target for
    // upserts, the numbers are stored for typed hit binding.
    builder.add_text_field("id", STRING | STORED);
    builder.add_u64_field("chapter_number", INDEXED | STORED | FAST);
    builder.add_u64_field("verse_number", INDEXED | STORED | FAST);
    builder.add_u64_field("indexed_at", STORED | FAST);

    builder.add_text_field("original_text", TEXT | STORED);
    builder.add_text_field("transliterated_text", TEXT | STORED);
    builder.add_text_field("translated_text", TEXT | STORED);
    builder.add_text_field("commentary_text", TEXT | STORED);
    builder.add_text_field("topic_tag", TEXT | STORED);

    builder.add_text_field("transliterated_text_ngram", ngram_options.clone());
    builder.add_text_field("translated_text_ngram", ngram_options.clone());
    builder.add_text_field("commentary_text_ngram", ngram_options.clone());
    builder.add_text_field("topic_tag_ngram", ngram_options);

    builder.build()
}

/// Resolve the field handles from a built schema.
pub fn resolve_fields(schema: &Schema) -> Result<VerseFields, SearchIndexError> {
    let field = |name: &str| {
        schema
            .get_field(name)
            .map_err(|e| SearchIndexError::open(format!("missing schema field {name}: {e}")))
    };

    Ok(VerseFields {
        id: field("id")?,
        chapter_number: field("chapter_number")?,
        verse_number: field("verse_number")?,
        indexed_at: field("indexed_at")?,
        original_text: field("original_text")?,
        transliterated_text: field("transliterated_text")?,
        translated_text: field("translated_text")?,
        commentary_text: field("commentary_text")?,
        topic_tag: field("topic_tag")?,
        transliterated_ngram: field("transliterated_text_ngram")?,
        translated_ngram: field("translated_text_ngram")?,
        commentary_ngram: field("commentary_text_ngram")?,
        topic_ngram: field("topic_tag_ngram")?,
    })
}

/// Register the n-gram analyzer with an index.
///
/// Must run after every open or create, before the first write or query.
pub fn register_tokenizers(index: &Index) -> Result<(), SearchIndexError> {
    let tokenizer = NgramTokenizer::new(NGRAM_MIN, NGRAM_MAX, false)
        .map_err(|e| SearchIndexError::open(format!("invalid n-gram tokenizer: {e}")))?;
    let analyzer = TextAnalyzer::builder(tokenizer).filter(LowerCaser).build();
    index.tokenizers().register(NGRAM_TOKENIZER, analyzer);
    Ok(())
}
