//! Pipeline service coordinating extraction, summarization, keyword scoring, and translation.

use crate::{
    config::Config,
    extraction::{Document, OcrEngine, TesseractOcr, extract_text},
    metrics::{MetricsSnapshot, PipelineMetrics},
    processing::{
        cleaning::{clean_text, preprocess_text},
        keywords::extract_keywords,
        summarize::{SummaryOptions, summarize_text},
        types::{KeywordError, PipelineError, SummarizeOptions, SummarizeReport},
    },
    summarization::{SummarizationClient, get_summarization_client},
    translation::{TranslationClient, get_translation_client},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Defaults applied when a request does not override them.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Model identifier passed to the summarization backend.
    pub model: String,
    /// Words per chunk handed to the model.
    pub max_chunk_words: usize,
    /// Lower bound on generated tokens per chunk.
    pub summary_min_length: usize,
    /// Upper bound on generated tokens per chunk.
    pub summary_max_length: usize,
    /// Word budget for the final summary.
    pub max_summary_words: usize,
    /// Number of keywords returned.
    pub keyword_count: usize,
    /// Language summaries and keywords are translated into.
    pub target_language: String,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.summarization_model.clone(),
            max_chunk_words: config.max_chunk_words,
            summary_min_length: config.summary_min_length,
            summary_max_length: config.summary_max_length,
            max_summary_words: config.max_summary_words,
            keyword_count: config.keyword_count,
            target_language: config.target_language.clone(),
        }
    }
}

/// Runs the document pipeline: extract, clean, summarize, score keywords, translate.
///
/// The service owns the model, translation, and OCR handles plus the metrics registry. Build it
/// once at startup and share it through an `Arc`; every request runs its stages strictly in
/// order and nothing is carried between requests except the counters.
pub struct PipelineService {
    summarizer: Box<dyn SummarizationClient + Send + Sync>,
    translator: Box<dyn TranslationClient + Send + Sync>,
    ocr: Arc<dyn OcrEngine>,
    settings: PipelineSettings,
    metrics: Arc<PipelineMetrics>,
}

/// Abstraction over the pipeline used by external surfaces (HTTP, CLI).
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Run the full pipeline for one uploaded document.
    async fn summarize_document(
        &self,
        document: Document,
        options: SummarizeOptions,
    ) -> Result<SummarizeReport, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl PipelineService {
    /// Build the service from configuration, constructing the configured backends.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        tracing::info!(
            provider = ?config.summarization_provider,
            model = %config.summarization_model,
            "Initializing summarization client"
        );
        let summarizer = get_summarization_client(config)?;
        let translator = get_translation_client(config)?;
        let ocr = Arc::new(TesseractOcr::new(
            config.tesseract_path.clone(),
            config.ocr_language.clone(),
        ));
        Ok(Self::with_clients(
            summarizer,
            translator,
            ocr,
            PipelineSettings::from(config),
        ))
    }

    /// Assemble a service from explicit backends.
    pub fn with_clients(
        summarizer: Box<dyn SummarizationClient + Send + Sync>,
        translator: Box<dyn TranslationClient + Send + Sync>,
        ocr: Arc<dyn OcrEngine>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            summarizer,
            translator,
            ocr,
            settings,
            metrics: Arc::new(PipelineMetrics::new()),
        }
    }

    /// Run the pipeline for one document, recording metrics for the outcome.
    pub async fn summarize_document(
        &self,
        document: Document,
        options: SummarizeOptions,
    ) -> Result<SummarizeReport, PipelineError> {
        let filename = document.filename.clone();
        tracing::info!(filename = %filename, kind = ?document.kind, "Summarizing document");

        match self.run(document, options).await {
            Ok(report) => {
                let skipped = report.chunks_total - report.chunks_summarized;
                self.metrics
                    .record_document(report.chunks_summarized as u64, skipped as u64);
                tracing::info!(
                    filename = %filename,
                    chunks_total = report.chunks_total,
                    chunks_summarized = report.chunks_summarized,
                    keywords = report.keywords.len(),
                    target_language = %report.target_language,
                    "Document summarized"
                );
                Ok(report)
            }
            Err(error) => {
                self.metrics.record_failure();
                tracing::warn!(
                    filename = %filename,
                    kind = error.kind(),
                    error = %error,
                    "Document pipeline failed"
                );
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        document: Document,
        options: SummarizeOptions,
    ) -> Result<SummarizeReport, PipelineError> {
        let settings = &self.settings;
        let target_language = options
            .target_language
            .filter(|language| !language.trim().is_empty())
            .unwrap_or_else(|| settings.target_language.clone());
        let max_summary_words = options
            .max_summary_words
            .unwrap_or(settings.max_summary_words);
        let top_n = options.top_n.unwrap_or(settings.keyword_count);

        let complete_text = extract_text(document, self.ocr.as_ref()).await?;
        let normalized = preprocess_text(&clean_text(&complete_text));
        tracing::debug!(
            extracted_chars = complete_text.len(),
            normalized_words = normalized.split_whitespace().count(),
            "Normalized text"
        );

        let summary_options = SummaryOptions {
            model: settings.model.clone(),
            max_chunk_words: settings.max_chunk_words,
            min_length: settings.summary_min_length,
            max_length: settings.summary_max_length,
            max_summary_words,
        };
        let outcome = summarize_text(self.summarizer.as_ref(), &normalized, &summary_options).await?;

        let keywords = match extract_keywords(&normalized, top_n) {
            Ok(keywords) => keywords,
            Err(KeywordError::EmptyVocabulary) => {
                tracing::debug!("No scoreable terms; returning no keywords");
                Vec::new()
            }
        };

        let (translated_summary, translated_keywords) = if options.skip_translation {
            (String::new(), Vec::new())
        } else {
            let translated_summary = self
                .translator
                .translate(&outcome.text, &target_language)
                .await?;
            let mut translated_keywords = Vec::with_capacity(keywords.len());
            for keyword in &keywords {
                translated_keywords.push(
                    self.translator
                        .translate(&keyword.term, &target_language)
                        .await?,
                );
            }
            (translated_summary, translated_keywords)
        };

        Ok(SummarizeReport {
            complete_text,
            summary: outcome.text,
            keywords,
            translated_summary,
            translated_keywords,
            target_language,
            chunks_total: outcome.chunks_total,
            chunks_summarized: outcome.chunks_summarized,
        })
    }

    /// Return the current pipeline metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl PipelineApi for PipelineService {
    async fn summarize_document(
        &self,
        document: Document,
        options: SummarizeOptions,
    ) -> Result<SummarizeReport, PipelineError> {
        PipelineService::summarize_document(self, document, options).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        PipelineService::metrics_snapshot(self)
    }
}
