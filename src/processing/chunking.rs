//! Word-bounded chunking and word-budget helpers.
//!
//! The summarization model only accepts a bounded input, so normalized text is cut into groups
//! of at most `max_chunk_words` whitespace-separated words. Chunks are built greedily in word
//! order: every chunk but the last holds exactly `max_chunk_words` words, and concatenating the
//! chunks' words reproduces the input's words.

use regex::Regex;
use std::sync::LazyLock;

use super::types::ChunkingError;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").expect("valid word pattern"));

/// Split text into chunks of at most `max_chunk_words` words.
///
/// Returns an empty vector when the input is empty or all whitespace.
pub fn split_into_chunks(
    text: &str,
    max_chunk_words: usize,
) -> Result<Vec<String>, ChunkingError> {
    if max_chunk_words == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words
        .chunks(max_chunk_words)
        .map(|group| group.join(" "))
        .collect())
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Cut `text` right after its `max_words`-th word, keeping the original separators.
///
/// Text within the budget is returned unchanged.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    if max_words == 0 {
        return String::new();
    }
    match WORD.find_iter(text).nth(max_words - 1) {
        Some(last) if text[last.end()..].trim().is_empty() => text.to_string(),
        Some(last) => text[..last.end()].to_string(),
        None => text.to_string(),
    }
}
