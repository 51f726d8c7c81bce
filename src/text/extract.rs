//! Plain-text extraction from uploaded documents
//!
//! Supports PDF (via lopdf), DOCX (zip + quick-xml over `word/document.xml`)
//! and plain text (UTF-8 with a Latin-1 fallback).

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;
use thiserror::Error;
use zip::ZipArchive;

use super::processor::preprocess;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TXT_MIME: &str = "text/plain";

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type: {0}. Allowed types: PDF, DOCX, TXT")]
    UnsupportedType(String),

    #[error("PDF processing failed: {0}")]
    Pdf(String),

    #[error("DOCX processing failed: {0}")]
    Docx(String),
}

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Resolve from a MIME type, ignoring parameters such as `charset`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            PDF_MIME => Some(Self::Pdf),
            DOCX_MIME => Some(Self::Docx),
            TXT_MIME => Some(Self::Txt),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
            Self::Txt => TXT_MIME,
        }
    }
}

/// Work out the effective content type of an upload.
///
/// The declared type wins unless it is missing or generic, in which case
/// the filename extension is consulted.
pub fn resolve_content_type(declared: Option<&str>, filename: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => mime.to_string(),
        _ => filename
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

/// Extract and clean the text of a document
pub fn extract_text(kind: DocumentKind, data: &[u8]) -> Result<String, ExtractError> {
    let raw = match kind {
        DocumentKind::Pdf => extract_pdf(data)?,
        DocumentKind::Docx => extract_docx(data)?,
        DocumentKind::Txt => decode_text(data),
    };
    Ok(preprocess(&raw))
}

/// Decode bytes as UTF-8, falling back to Latin-1
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let document = lopdf::Document::load_mem(data).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let pages: Vec<u32> = document.get_pages().keys().copied().collect();
    if pages.is_empty() {
        return Ok(String::new());
    }
    document
        .extract_text(&pages)
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}

fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(e.to_string()))?;

    document_xml_text(&xml)
}

/// Collect run text from WordprocessingML, one line per paragraph
fn document_xml_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let unescaped = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime() {
        assert_eq!(DocumentKind::from_mime("application/pdf"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_mime("text/plain; charset=utf-8"),
            Some(DocumentKind::Txt)
        );
        assert_eq!(DocumentKind::from_mime(DOCX_MIME), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_mime("image/png"), None);
    }

    #[test]
    fn test_resolve_content_type() {
        assert_eq!(resolve_content_type(Some("text/plain"), Some("a.pdf")), "text/plain");
        assert_eq!(
            resolve_content_type(Some("application/octet-stream"), Some("notes.txt")),
            "text/plain"
        );
        assert_eq!(resolve_content_type(None, Some("paper.pdf")), "application/pdf");
        assert_eq!(resolve_content_type(None, None), "application/octet-stream");
    }

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text(DocumentKind::Txt, b"Hello world").unwrap();
        assert_eq!(text, "Hello world");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "café" in Latin-1
        let text = decode_text(&[0x63, 0x61, 0x66, 0xE9]);
        assert_eq!(text, "café");
    }

    #[test]
    fn test_document_xml_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First &amp; foremost</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Second </w:t></w:r><w:r><w:t>line</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
        let text = document_xml_text(xml).unwrap();
        assert_eq!(text, "First & foremost\nSecond line\n");
    }

    #[test]
    fn test_invalid_pdf() {
        let result = extract_text(DocumentKind::Pdf, b"not a pdf");
        assert!(matches!(result, Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_invalid_docx() {
        let result = extract_text(DocumentKind::Docx, b"not a zip");
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }
}
