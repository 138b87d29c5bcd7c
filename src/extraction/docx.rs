use super::ExtractionError;
use quick_xml::{Reader, events::Event};
use std::io::{Cursor, Read};
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

/// Join the text of each body-level paragraph with `\n`.
///
/// Paragraphs inside tables, text boxes and other containers are not body paragraphs and are
/// skipped, as is text of paragraphs nested inside a body paragraph.
pub(super) fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|error| ExtractionError::Docx(format!("invalid archive: {error}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|error| ExtractionError::Docx(format!("missing {DOCUMENT_PART}: {error}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|error| ExtractionError::Docx(format!("failed to read {DOCUMENT_PART}: {error}")))?;

    let paragraphs = body_paragraphs(&xml)?;
    tracing::trace!(paragraphs = paragraphs.len(), "Parsed DOCX");
    Ok(paragraphs.join("\n"))
}

fn body_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut nested = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|error| ExtractionError::Docx(format!("malformed XML: {error}")))?;
        match event {
            Event::Start(element) => {
                let name = element.name().as_ref().to_vec();
                match name.as_slice() {
                    b"w:p" if current.is_none() && parent_is(&path, b"w:body") => {
                        current = Some(String::new());
                    }
                    b"w:p" if current.is_some() => nested += 1,
                    b"w:t" if current.is_some() && nested == 0 => in_text = true,
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(element) => {
                let name = element.name();
                match name.as_ref() {
                    b"w:p" if current.is_none() && parent_is(&path, b"w:body") => {
                        paragraphs.push(String::new());
                    }
                    b"w:tab" if nested == 0 && parent_is(&path, b"w:r") => {
                        if let Some(text) = current.as_mut() {
                            text.push('\t');
                        }
                    }
                    b"w:br" | b"w:cr" if nested == 0 && parent_is(&path, b"w:r") => {
                        if let Some(text) = current.as_mut() {
                            text.push('\n');
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(content) if in_text => {
                let value = content
                    .unescape()
                    .map_err(|error| ExtractionError::Docx(format!("bad text node: {error}")))?;
                if let Some(text) = current.as_mut() {
                    text.push_str(&value);
                }
            }
            Event::End(element) => {
                path.pop();
                match element.name().as_ref() {
                    b"w:t" => in_text = false,
                    b"w:p" if nested > 0 => nested -= 1,
                    b"w:p" => {
                        if let Some(text) = current.take() {
                            paragraphs.push(text);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

fn parent_is(path: &[Vec<u8>], name: &[u8]) -> bool {
    path.last().is_some_and(|parent| parent.as_slice() == name)
}
