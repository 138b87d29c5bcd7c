//! Abstractions for generating abstractive summaries through a model backend.
//!
//! Two backends are supported: the Hugging Face inference API, which runs a pretrained
//! sequence-to-sequence model (`t5-small` by default) with explicit output length bounds, and a
//! local Ollama runtime prompted to summarize. Both are reached over plain HTTP.

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while running the summarization model.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was unreachable or refused the model.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// One chunk handed to the summarization model.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Chunk text to summarize.
    pub text: String,
    /// Minimum generated length, in model tokens.
    pub min_length: usize,
    /// Maximum generated length, in model tokens.
    pub max_length: usize,
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary for a single chunk.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client selected by configuration.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Box<dyn SummarizationClient + Send + Sync>, SummarizationClientError> {
    match config.summarization_provider {
        SummarizationProvider::HuggingFace => {
            let base_url = config
                .summarization_url
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string());
            Ok(Box::new(HuggingFaceSummarizationClient::new(
                base_url,
                config.hf_api_token.clone(),
            )?))
        }
        SummarizationProvider::Ollama => {
            let base_url = config
                .summarization_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Ok(Box::new(OllamaSummarizationClient::new(base_url)?))
        }
    }
}

fn build_http_client() -> Result<Client, SummarizationClientError> {
    Client::builder()
        .user_agent("docsum/summary")
        .build()
        .map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to construct HTTP client: {error}"
            ))
        })
}

struct HuggingFaceSummarizationClient {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizationClient {
    fn new(base_url: String, api_token: Option<String>) -> Result<Self, SummarizationClientError> {
        Ok(Self {
            http: build_http_client()?,
            base_url,
            api_token,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct HuggingFaceSummary {
    summary_text: String,
}

#[async_trait]
impl SummarizationClient for HuggingFaceSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let endpoint = self.endpoint(&request.model);
        let payload = json!({
            "inputs": request.text,
            "parameters": {
                "min_length": request.min_length,
                "max_length": request.max_length,
                "do_sample": false,
            },
            "options": {
                "wait_for_model": true,
            }
        });

        let mut builder = self.http.post(&endpoint).json(&payload);
        if let Some(token) = self.api_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|error| {
            SummarizationClientError::ProviderUnavailable(format!(
                "failed to reach inference API at {}: {error}",
                self.base_url
            ))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "inference endpoint {endpoint} returned {status}"
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "inference API returned {status}: {body}"
            )));
        }

        let body: Vec<HuggingFaceSummary> = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode inference response: {error}"
            ))
        })?;

        body.into_iter()
            .next()
            .map(|summary| summary.summary_text.trim().to_string())
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse(
                    "inference response contained no summaries".into(),
                )
            })
    }
}

struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
}

impl OllamaSummarizationClient {
    fn new(base_url: String) -> Result<Self, SummarizationClientError> {
        Ok(Self {
            http: build_http_client()?,
            base_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(request: &SummarizationRequest) -> String {
    format!(
        "Summarize the following text in roughly {} to {} words. Return only the summary as a single paragraph.\n\n{}",
        request.min_length, request.max_length, request.text
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": build_prompt(&request),
            "stream": false,
            "options": {
                // Lower temperature for deterministic summaries.
                "temperature": 0.1,
                "num_predict": request.max_length,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}
