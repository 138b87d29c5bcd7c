use super::ExtractionError;
use async_trait::async_trait;
use std::io::Write;
use tokio::process::Command;

/// Optical character recognition over raw image bytes.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize the text in an image. Output is returned uncorrected.
    async fn recognize(&self, image: &[u8]) -> Result<String, ExtractionError>;
}

/// OCR through the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl TesseractOcr {
    /// Use the given tesseract binary and language pack (for example `eng`).
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image: &[u8]) -> Result<String, ExtractionError> {
        let mut input = tempfile::Builder::new()
            .prefix("docsum-ocr-")
            .tempfile()
            .map_err(|error| ExtractionError::Ocr(format!("failed to create temp file: {error}")))?;
        input
            .write_all(image)
            .and_then(|()| input.flush())
            .map_err(|error| ExtractionError::Ocr(format!("failed to write temp file: {error}")))?;

        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .await
            .map_err(|error| {
                ExtractionError::Ocr(format!(
                    "failed to run tesseract (path='{}'): {error}",
                    self.binary
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(chars = text.len(), language = %self.language, "OCR complete");
        Ok(text)
    }
}
