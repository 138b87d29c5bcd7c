//! Chunked abstractive summarization with a global word budget.

use super::chunking::{count_words, split_into_chunks, truncate_words};
use super::refine::refine_summary;
use super::types::{SummarizeError, SummaryOutcome};
use crate::summarization::{SummarizationClient, SummarizationRequest};

/// Parameters for one summarization run.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Model identifier passed to the backend.
    pub model: String,
    /// Words per chunk handed to the model.
    pub max_chunk_words: usize,
    /// Lower bound on generated tokens per chunk.
    pub min_length: usize,
    /// Upper bound on generated tokens per chunk.
    pub max_length: usize,
    /// Word budget for the combined summary.
    pub max_summary_words: usize,
}

/// Summarize `text` chunk by chunk until the word budget is reached.
///
/// Chunks are summarized in document order. Once the accumulated summaries reach
/// `max_summary_words`, the remaining chunks are skipped. The joined summary is truncated to the
/// budget, refined, and truncated again since refinement can split `a,b` into two words.
pub async fn summarize_text(
    client: &dyn SummarizationClient,
    text: &str,
    options: &SummaryOptions,
) -> Result<SummaryOutcome, SummarizeError> {
    let chunks = split_into_chunks(text, options.max_chunk_words)?;
    let chunks_total = chunks.len();

    let mut summaries = Vec::new();
    let mut total_words = 0;
    for (index, chunk) in chunks.into_iter().enumerate() {
        if total_words >= options.max_summary_words {
            tracing::debug!(
                chunk = index,
                skipped = chunks_total - index,
                total_words,
                "Summary word budget reached; skipping remaining chunks"
            );
            break;
        }

        let summary = client
            .generate_summary(SummarizationRequest {
                model: options.model.clone(),
                text: chunk,
                min_length: options.min_length,
                max_length: options.max_length,
            })
            .await?;
        total_words += count_words(&summary);
        summaries.push(summary);
    }

    let chunks_summarized = summaries.len();
    let joined = summaries.join(" ");
    let truncated = truncate_words(&joined, options.max_summary_words);
    let refined = refine_summary(&truncated);
    let text = truncate_words(&refined, options.max_summary_words);

    tracing::debug!(
        chunks_total,
        chunks_summarized,
        words = count_words(&text),
        "Summarized document"
    );

    Ok(SummaryOutcome {
        text,
        chunks_total,
        chunks_summarized,
    })
}
