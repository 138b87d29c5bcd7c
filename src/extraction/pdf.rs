use super::ExtractionError;
use std::panic::{AssertUnwindSafe, catch_unwind};

const PDF_MAGIC: &[u8] = b"%PDF";

/// Concatenate the text of every page, in page order, with no separator.
///
/// A page without text contributes nothing, even when the parser reports layout whitespace for
/// it.
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !has_pdf_header(bytes) {
        return Err(ExtractionError::Pdf("missing %PDF header".into()));
    }

    // The parser panics on some malformed inputs.
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| ExtractionError::Pdf("parser panicked on malformed document".into()))?
    .map_err(|error| ExtractionError::Pdf(error.to_string()))?;

    tracing::trace!(pages = pages.len(), "Parsed PDF");
    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(String::as_str)
        .collect()
}

/// The header may be preceded by junk bytes within the first kilobyte.
fn has_pdf_header(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window
        .windows(PDF_MAGIC.len())
        .any(|candidate| candidate == PDF_MAGIC)
}
