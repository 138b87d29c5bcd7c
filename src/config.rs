use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SUMMARIZATION_MODEL: &str = "t5-small";
const DEFAULT_TRANSLATION_URL: &str = "https://translate.googleapis.com";
const DEFAULT_TARGET_LANGUAGE: &str = "hi";
const DEFAULT_MAX_CHUNK_WORDS: usize = 512;
const DEFAULT_SUMMARY_MIN_LENGTH: usize = 30;
const DEFAULT_SUMMARY_MAX_LENGTH: usize = 130;
const DEFAULT_MAX_SUMMARY_WORDS: usize = 1000;
const DEFAULT_KEYWORD_COUNT: usize = 10;
const DEFAULT_TESSERACT_PATH: &str = "tesseract";
const DEFAULT_OCR_LANGUAGE: &str = "eng";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the document summarizer.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backend used to run the summarization model.
    pub summarization_provider: SummarizationProvider,
    /// Model identifier passed to the summarization backend.
    pub summarization_model: String,
    /// Optional base URL override for the summarization backend.
    pub summarization_url: Option<String>,
    /// Optional bearer token for the Hugging Face inference API.
    pub hf_api_token: Option<String>,
    /// Base URL of the translation service.
    pub translation_url: String,
    /// Language code summaries and keywords are translated into.
    pub target_language: String,
    /// Maximum number of words handed to the model per chunk.
    pub max_chunk_words: usize,
    /// Lower bound on tokens generated per chunk summary.
    pub summary_min_length: usize,
    /// Upper bound on tokens generated per chunk summary.
    pub summary_max_length: usize,
    /// Global word budget for the final summary.
    pub max_summary_words: usize,
    /// Number of keywords returned per document.
    pub keyword_count: usize,
    /// Path to the tesseract binary used for image OCR.
    pub tesseract_path: String,
    /// Tesseract language pack passed via `-l`.
    pub ocr_language: String,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
}

/// Supported summarization backends.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProvider {
    /// Hugging Face inference API running a sequence-to-sequence model.
    HuggingFace,
    /// Local Ollama runtime prompted to summarize.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            summarization_provider: load_env_optional("SUMMARIZATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or(SummarizationProvider::HuggingFace),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string()),
            summarization_url: load_env_optional("SUMMARIZATION_URL"),
            hf_api_token: load_env_optional("HF_API_TOKEN"),
            translation_url: load_env_optional("TRANSLATION_URL")
                .unwrap_or_else(|| DEFAULT_TRANSLATION_URL.to_string()),
            target_language: target_language_from(env::var("TARGET_LANGUAGE").ok())?,
            max_chunk_words: load_parsed("MAX_CHUNK_WORDS")?.unwrap_or(DEFAULT_MAX_CHUNK_WORDS),
            summary_min_length: load_parsed("SUMMARY_MIN_LENGTH")?
                .unwrap_or(DEFAULT_SUMMARY_MIN_LENGTH),
            summary_max_length: load_parsed("SUMMARY_MAX_LENGTH")?
                .unwrap_or(DEFAULT_SUMMARY_MAX_LENGTH),
            max_summary_words: load_parsed("MAX_SUMMARY_WORDS")?
                .unwrap_or(DEFAULT_MAX_SUMMARY_WORDS),
            keyword_count: load_parsed("KEYWORD_COUNT")?.unwrap_or(DEFAULT_KEYWORD_COUNT),
            tesseract_path: load_env_optional("TESSERACT_PATH")
                .unwrap_or_else(|| DEFAULT_TESSERACT_PATH.to_string()),
            ocr_language: load_env_optional("OCR_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_OCR_LANGUAGE.to_string()),
            server_port: load_parsed("SERVER_PORT")?,
            max_upload_bytes: load_parsed("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunk_words == 0 {
            return Err(ConfigError::InvalidValue("MAX_CHUNK_WORDS".into()));
        }
        if self.summary_min_length > self.summary_max_length {
            return Err(ConfigError::InvalidValue(
                "SUMMARY_MIN_LENGTH exceeds SUMMARY_MAX_LENGTH".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summarization_provider: SummarizationProvider::HuggingFace,
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            summarization_url: None,
            hf_api_token: None,
            translation_url: DEFAULT_TRANSLATION_URL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            max_chunk_words: DEFAULT_MAX_CHUNK_WORDS,
            summary_min_length: DEFAULT_SUMMARY_MIN_LENGTH,
            summary_max_length: DEFAULT_SUMMARY_MAX_LENGTH,
            max_summary_words: DEFAULT_MAX_SUMMARY_WORDS,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            tesseract_path: DEFAULT_TESSERACT_PATH.to_string(),
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            server_port: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Unset falls back to the default; set but blank is an error rather than a silent fallback.
fn target_language_from(raw: Option<String>) -> Result<String, ConfigError> {
    match raw {
        None => Ok(DEFAULT_TARGET_LANGUAGE.to_string()),
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::InvalidValue("TARGET_LANGUAGE".into()))
        }
        Some(value) => Ok(value.trim().to_string()),
    }
}

fn load_parsed<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        provider = ?config.summarization_provider,
        model = %config.summarization_model,
        target_language = %config.target_language,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
