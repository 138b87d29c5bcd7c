//! Single-document TF-IDF keyword extraction.
//!
//! The corpus is the document itself, so the smoothed inverse document frequency is the same
//! constant for every term and the ranking reduces to L2-normalized term frequency. Terms with
//! equal scores are ordered alphabetically so results are reproducible.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::stopwords::is_stopword;
use super::types::{KeywordError, ScoredKeyword};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Rank the document's terms by TF-IDF and return the `top_n` best.
///
/// Returns fewer than `top_n` keywords when the vocabulary is smaller, and
/// [`KeywordError::EmptyVocabulary`] when no term survives stopword filtering.
pub fn extract_keywords(text: &str, top_n: usize) -> Result<Vec<ScoredKeyword>, KeywordError> {
    let lowered = text.to_lowercase();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for token in TOKEN.find_iter(&lowered) {
        let term = token.as_str();
        if is_stopword(term) {
            continue;
        }
        *counts.entry(term).or_default() += 1;
    }

    if counts.is_empty() {
        return Err(KeywordError::EmptyVocabulary);
    }

    let idf = smoothed_idf(1, 1);
    let weights: Vec<(&str, f64)> = counts
        .into_iter()
        .map(|(term, count)| (term, count as f64 * idf))
        .collect();
    let norm = weights
        .iter()
        .map(|(_, weight)| weight * weight)
        .sum::<f64>()
        .sqrt();

    let mut scored: Vec<ScoredKeyword> = weights
        .into_iter()
        .map(|(term, weight)| ScoredKeyword {
            term: term.to_string(),
            score: weight / norm,
        })
        .collect();
    scored.sort_by(|left, right| {
        right
            .score
            .total_cmp(&left.score)
            .then_with(|| left.term.cmp(&right.term))
    });
    scored.truncate(top_n);

    tracing::trace!(keywords = scored.len(), "Extracted keywords");
    Ok(scored)
}

/// `ln((1 + n) / (1 + df)) + 1`
fn smoothed_idf(document_count: usize, document_frequency: usize) -> f64 {
    ((1.0 + document_count as f64) / (1.0 + document_frequency as f64)).ln() + 1.0
}
