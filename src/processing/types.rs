//! Core data types and error definitions for the summarization pipeline.

use crate::{
    extraction::ExtractionError, summarization::SummarizationClientError,
    translation::TranslationClientError,
};
use thiserror::Error;

/// Errors produced while splitting normalized text into model-sized chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// Caller configured an impossible word budget.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors produced by the TF-IDF keyword extractor.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// Text contained no scoreable terms once stopwords were removed.
    #[error("empty vocabulary; the document contains only stopwords or no words at all")]
    EmptyVocabulary,
}

/// Errors produced while summarizing normalized text.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Chunking step rejected its configuration.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Summarization backend failed for one of the chunks.
    #[error("Model inference failed: {0}")]
    Model(#[from] SummarizationClientError),
}

/// Errors emitted by the document pipeline.
///
/// Each stage keeps its own variant so callers can branch on the failure kind; the HTTP layer
/// still collapses them into a single error response.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request did not carry a `file` field.
    #[error("No file uploaded; expected a multipart field named 'file'")]
    MissingFile,
    /// Request could not be read (bad multipart body, malformed query string, oversized upload).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Text extraction failed for the uploaded document.
    #[error("Failed to extract text: {0}")]
    Extraction(#[from] ExtractionError),
    /// Chunking step rejected its configuration.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Summarization backend failed.
    #[error("Model inference failed: {0}")]
    ModelInference(#[from] SummarizationClientError),
    /// Translation service failed.
    #[error("Translation failed: {0}")]
    TranslationService(#[from] TranslationClientError),
    /// Catch-all for failures outside the stage taxonomy.
    #[error("Pipeline failure: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Stable label for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Extraction(ExtractionError::UnsupportedFormat { .. }) => "unsupported_format",
            Self::Extraction(ExtractionError::Decode(_)) => "decode_error",
            Self::Extraction(_) => "extraction_error",
            Self::Chunking(_) => "chunking_error",
            Self::ModelInference(_) => "model_inference_error",
            Self::TranslationService(_) => "translation_service_error",
            Self::Internal(_) => "pipeline_error",
        }
    }
}

impl From<SummarizeError> for PipelineError {
    fn from(error: SummarizeError) -> Self {
        match error {
            SummarizeError::Chunking(inner) => Self::Chunking(inner),
            SummarizeError::Model(inner) => Self::ModelInference(inner),
        }
    }
}

/// Result of summarizing one document.
#[derive(Debug, Clone, Default)]
pub struct SummaryOutcome {
    /// Refined summary text, bounded by the word budget.
    pub text: String,
    /// Number of chunks the normalized text was split into.
    pub chunks_total: usize,
    /// Number of chunks actually sent to the model before the budget was met.
    pub chunks_summarized: usize,
}

impl SummaryOutcome {
    /// Chunks dropped by early termination.
    pub fn chunks_skipped(&self) -> usize {
        self.chunks_total.saturating_sub(self.chunks_summarized)
    }
}

/// Keyword with its TF-IDF weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredKeyword {
    /// Lowercased term.
    pub term: String,
    /// L2-normalized TF-IDF score in `(0, 1]`.
    pub score: f64,
}

/// Per-request overrides for the pipeline defaults.
#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    /// Language code to translate into; defaults to the configured target language.
    pub target_language: Option<String>,
    /// Word budget for the summary; defaults to the configured budget.
    pub max_summary_words: Option<usize>,
    /// Number of keywords; defaults to the configured keyword count.
    pub top_n: Option<usize>,
    /// Skip the translation stage entirely (translated fields come back empty).
    pub skip_translation: bool,
}

/// Everything the pipeline produced for one document.
#[derive(Debug, Clone, Default)]
pub struct SummarizeReport {
    /// Text as extracted from the document, before cleaning.
    pub complete_text: String,
    /// Refined summary.
    pub summary: String,
    /// Top keywords ordered by descending score.
    pub keywords: Vec<ScoredKeyword>,
    /// Summary rendered in the target language.
    pub translated_summary: String,
    /// Each keyword rendered in the target language, in keyword order.
    pub translated_keywords: Vec<String>,
    /// Language the translated fields are in.
    pub target_language: String,
    /// Number of chunks the normalized text was split into.
    pub chunks_total: usize,
    /// Number of chunks sent to the model.
    pub chunks_summarized: usize,
}

impl SummarizeReport {
    /// Keyword terms without scores.
    pub fn keyword_terms(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|keyword| keyword.term.clone())
            .collect()
    }
}
