use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing pipeline activity since startup.
#[derive(Default)]
pub struct PipelineMetrics {
    documents_processed: AtomicU64,
    chunks_summarized: AtomicU64,
    chunks_skipped: AtomicU64,
    failed_documents: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed document along with how many chunks reached the model and how many
    /// were dropped by the summary word budget.
    pub fn record_document(&self, chunks_summarized: u64, chunks_skipped: u64) {
        self.documents_processed.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunks_summarized, Ordering::Relaxed);
        self.chunks_skipped
            .fetch_add(chunks_skipped, Ordering::Relaxed);
    }

    /// Record a document whose pipeline run aborted with an error.
    pub fn record_failure(&self) {
        self.failed_documents.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_processed: self.documents_processed.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            chunks_skipped: self.chunks_skipped.load(Ordering::Relaxed),
            failed_documents: self.failed_documents.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Documents summarized successfully since startup.
    pub documents_processed: u64,
    /// Chunks sent to the summarization model.
    pub chunks_summarized: u64,
    /// Chunks never summarized because the word budget was already met.
    pub chunks_skipped: u64,
    /// Documents whose pipeline run ended in an error.
    pub failed_documents: u64,
}
