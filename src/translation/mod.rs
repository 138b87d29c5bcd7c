//! Machine translation of summaries and keywords.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by translation backends.
#[derive(Debug, Error)]
pub enum TranslationClientError {
    /// Translation service could not be reached.
    #[error("Translation service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Translation service answered with an error status.
    #[error("Translation request failed: {0}")]
    RequestFailed(String),
    /// Translation service answered with a payload we cannot read.
    #[error("Malformed translation response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by translation backends.
#[async_trait]
pub trait TranslationClient: Send + Sync {
    /// Translate `text` into `target_language`, detecting the source language.
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationClientError>;
}

/// Build the translation client configured for this process.
pub fn get_translation_client(
    config: &Config,
) -> Result<Box<dyn TranslationClient + Send + Sync>, TranslationClientError> {
    Ok(Box::new(GoogleTranslateClient::new(
        config.translation_url.clone(),
    )?))
}

/// Client for the public Google Translate web endpoint (`client=gtx`).
pub struct GoogleTranslateClient {
    http: Client,
    base_url: String,
}

impl GoogleTranslateClient {
    /// Create a client against `base_url`, normally `https://translate.googleapis.com`.
    pub fn new(base_url: String) -> Result<Self, TranslationClientError> {
        let http = Client::builder()
            .user_agent("docsum/translate")
            .build()
            .map_err(|error| {
                TranslationClientError::ServiceUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/translate_a/single",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl TranslationClient for GoogleTranslateClient {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationClientError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let response = self
            .http
            .post(self.endpoint())
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
            ])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(|error| {
                TranslationClientError::ServiceUnavailable(format!(
                    "failed to reach translation service at {}: {error}",
                    self.base_url
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationClientError::RequestFailed(format!(
                "translation service returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(|error| {
            TranslationClientError::InvalidResponse(format!(
                "failed to decode translation response: {error}"
            ))
        })?;
        let translated = join_segments(&body)?;
        tracing::trace!(
            target_language,
            chars = translated.len(),
            "Translated text"
        );
        Ok(translated)
    }
}

/// The payload is `[[["<translated>", "<source>", ...], ...], ...]`; long inputs come back as
/// several sentence segments.
fn join_segments(body: &Value) -> Result<String, TranslationClientError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationClientError::InvalidResponse("missing segment list".into()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }
    Ok(translated)
}
