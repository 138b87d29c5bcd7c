//! Text normalization ahead of summarization and keyword scoring.
//!
//! Both stages are lossy on purpose: `clean_text` strips sentence punctuation and
//! `preprocess_text` drops stopwords, so sentence boundaries do not survive into the summarizer.
//! The summary refinement step reintroduces what punctuation the model emits.

use regex::Regex;
use std::sync::LazyLock;

use super::stopwords::is_stopword;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));

/// Collapse whitespace runs, strip every non-word character, and trim.
pub fn clean_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let stripped = NON_WORD.replace_all(&collapsed, "");
    stripped.trim().to_string()
}

/// Keep only alphabetic, non-stopword tokens, joined by single spaces.
///
/// Leading and trailing punctuation is split off a token before it is judged, so the function
/// also behaves on text that did not go through [`clean_text`].
pub fn preprocess_text(text: &str) -> String {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| is_alphabetic(token) && !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_alphabetic(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphabetic)
}
