//! Query builders for the verse index.
//!
//! The primary query is a boosted OR-disjunction over the exact fields plus
//! their n-gram shadows. The fallback is a single fuzzy pass (edit distance
//! 1) over the primary text fields, issued only when the primary query
//! matched nothing.

use tantivy::query::{BooleanQuery, BoostQuery, EmptyQuery, FuzzyTermQuery, Occur, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::{Index, Term};

use super::schema::{NgramCoverage, VerseFields, NGRAM_TOKENIZER};
use crate::errors::SearchIndexError;

/// Maximum edit distance tolerated by the fallback query.
const FUZZY_DISTANCE: u8 = 1;

/// Tokenizer used by the exact fields.
const DEFAULT_TOKENIZER: &str = "default";

/// Run `text` through a registered analyzer and collect the token texts.
fn analyze(index: &Index, tokenizer: &str, text: &str) -> Result<Vec<String>, SearchIndexError> {
    let mut analyzer = index
        .tokenizers()
        .get(tokenizer)
        .ok_or_else(|| SearchIndexError::query(format!("tokenizer {tokenizer} not registered")))?;

    let mut tokens = Vec::new();
    let mut stream = analyzer.token_stream(text);
    while let Some(token) = stream.next() {
        tokens.push(token.text.clone());
    }
    Ok(tokens)
}

/// One should-clause per term on a single field, wrapped in a boost.
fn boosted_field_clause(field: Field, terms: &[String], boost: f32) -> Option<Box<dyn Query>> {
    if terms.is_empty() {
        return None;
    }
    let subqueries: Vec<(Occur, Box<dyn Query>)> = terms
        .iter()
        .map(|term| {
            let term_query = TermQuery::new(
                Term::from_field_text(field, term),
                IndexRecordOption::WithFreqs,
            );
            (Occur::Should, Box::new(term_query) as Box<dyn Query>)
        })
        .collect();
    let field_query = BooleanQuery::new(subqueries);
    Some(Box::new(BoostQuery::new(Box::new(field_query), boost)))
}

/// Build the primary disjunction query.
///
/// Exact-field clauses use the default analyzer and the schema boosts;
/// n-gram clauses tokenize the query through the n-gram analyzer and target
/// the shadow fields at one fifth of the exact boost. At least one clause
/// must match.
pub fn build_primary_query(
    index: &Index,
    fields: &VerseFields,
    coverage: NgramCoverage,
    query_text: &str,
) -> Result<Box<dyn Query>, SearchIndexError> {
    let query_text = query_text.trim();
    if query_text.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }

    let exact_terms = analyze(index, DEFAULT_TOKENIZER, query_text)?;
    let ngram_terms = analyze(index, NGRAM_TOKENIZER, query_text)?;

    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    for (field, boost) in fields.searchable_exact() {
        if let Some(clause) = boosted_field_clause(field, &exact_terms, boost) {
            clauses.push((Occur::Should, clause));
        }
    }
    for (field, boost) in fields.searchable_ngram(coverage) {
        if let Some(clause) = boosted_field_clause(field, &ngram_terms, boost) {
            clauses.push((Occur::Should, clause));
        }
    }

    if clauses.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }
    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// Build the fuzzy fallback query: edit distance 1 per term over the
/// primary text fields, transpositions counted as a single edit.
pub fn build_fuzzy_query(
    index: &Index,
    fields: &VerseFields,
    query_text: &str,
) -> Result<Box<dyn Query>, SearchIndexError> {
    let terms = analyze(index, DEFAULT_TOKENIZER, query_text.trim())?;
    if terms.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }

    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
    for field in fields.fuzzy_fields() {
        for term in &terms {
            let fuzzy = FuzzyTermQuery::new(
                Term::from_field_text(field, term),
                FUZZY_DISTANCE,
                true,
            );
            clauses.push((Occur::Should, Box::new(fuzzy)));
        }
    }
    Ok(Box::new(BooleanQuery::new(clauses)))
}
