//! Document processing pipeline: cleaning, chunked summarization, keywords, and orchestration.

pub mod chunking;
pub mod cleaning;
pub mod keywords;
pub mod refine;
mod service;
mod stopwords;
pub mod summarize;
pub mod types;

pub use service::{PipelineApi, PipelineService, PipelineSettings};
pub use types::{
    ChunkingError, KeywordError, PipelineError, ScoredKeyword, SummarizeError, SummarizeOptions,
    SummarizeReport, SummaryOutcome,
};
