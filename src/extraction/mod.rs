//! Text extraction for uploaded documents.
//!
//! The file extension decides the extractor. PDF and DOCX parsing are CPU bound and run on the
//! blocking pool; OCR is delegated to an [`OcrEngine`].

mod docx;
mod ocr;
mod pdf;

pub use ocr::{OcrEngine, TesseractOcr};

use std::path::Path;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors produced while turning an uploaded file into plain text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Extension is not handled and the bytes are not valid UTF-8 either.
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat {
        /// Lowercased file extension.
        extension: String,
    },
    /// Text file was not valid UTF-8.
    #[error("Failed to decode text as UTF-8: {0}")]
    Decode(#[from] FromUtf8Error),
    /// PDF could not be parsed.
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
    /// DOCX container or XML could not be parsed.
    #[error("Failed to read DOCX: {0}")]
    Docx(String),
    /// OCR engine failed.
    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// Format of an uploaded document, derived from its file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.pdf`
    Pdf,
    /// `.docx`
    Docx,
    /// `.jpg`, `.jpeg`, `.png`
    Image,
    /// `.txt`, `.md`, or no extension at all.
    PlainText,
    /// Any other extension, lowercased.
    Other(String),
}

impl DocumentKind {
    /// Classify a file by its extension, ignoring case.
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("jpg" | "jpeg" | "png") => Self::Image,
            None | Some("txt" | "md") => Self::PlainText,
            Some(other) => Self::Other(other.to_string()),
        }
    }
}

/// Uploaded file awaiting extraction.
#[derive(Debug, Clone)]
pub struct Document {
    /// Client-supplied filename.
    pub filename: String,
    /// Format derived from `filename`.
    pub kind: DocumentKind,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl Document {
    /// Wrap uploaded bytes, classifying them by filename.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let kind = DocumentKind::from_filename(&filename);
        Self {
            filename,
            kind,
            bytes,
        }
    }
}

/// Extract plain text from `document`.
pub async fn extract_text(
    document: Document,
    ocr: &dyn OcrEngine,
) -> Result<String, ExtractionError> {
    let Document {
        filename,
        kind,
        bytes,
    } = document;
    tracing::debug!(filename = %filename, kind = ?kind, bytes = bytes.len(), "Extracting text");

    let text = match kind {
        DocumentKind::Pdf => tokio::task::spawn_blocking(move || pdf::extract_pdf_text(&bytes))
            .await
            .map_err(|error| ExtractionError::Pdf(format!("extraction task failed: {error}")))??,
        DocumentKind::Docx => tokio::task::spawn_blocking(move || docx::extract_docx_text(&bytes))
            .await
            .map_err(|error| ExtractionError::Docx(format!("extraction task failed: {error}")))??,
        DocumentKind::Image => ocr.recognize(&bytes).await?,
        DocumentKind::PlainText => String::from_utf8(bytes)?,
        DocumentKind::Other(extension) => String::from_utf8(bytes)
            .map_err(|_| ExtractionError::UnsupportedFormat { extension })?,
    };

    tracing::debug!(filename = %filename, chars = text.len(), "Extracted text");
    Ok(text)
}
