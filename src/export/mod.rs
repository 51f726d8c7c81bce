//! Export Module
//!
//! Renders summaries to downloadable documents.
//!
//! Formats:
//! - PDF: US Letter pages, Helvetica, bold title
//! - DOCX: WordprocessingML with a bold title and bold metadata keys
//! - TXT: `# title`, `key: value` metadata lines, content
//! - CSV: `Filename,Content` row followed by an optional metadata block

pub mod docx;
pub mod pdf;
pub mod text;
pub mod types;

use chrono::Utc;
use serde::Serialize;

pub use types::{sanitize_filename, ExportError, ExportFormat, ExportRequest, ExportedDocument};

/// Render an export request into document bytes
pub fn render(request: &ExportRequest) -> Result<ExportedDocument, ExportError> {
    let format = request.format()?;
    let filename = request.filename();
    let metadata = request.metadata_entries();
    let content = request.content.as_str();

    let bytes = match format {
        ExportFormat::Pdf => pdf::render_pdf(&filename, &metadata, content, Utc::now())?,
        ExportFormat::Docx => docx::render_docx(&filename, &metadata, content, Utc::now())?,
        ExportFormat::Txt => text::render_txt(&filename, &metadata, content),
        ExportFormat::Csv => text::render_csv(&filename, &metadata, content)?,
    };

    tracing::debug!(
        format = format.extension(),
        filename = %filename,
        bytes = bytes.len(),
        "Rendered export"
    );

    Ok(ExportedDocument {
        bytes,
        format,
        filename,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct FormatInfo {
    pub format: ExportFormat,
    pub name: &'static str,
    pub description: &'static str,
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub features: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportFormats {
    pub formats: Vec<FormatInfo>,
    /// Metadata keys the clients usually send along with a summary
    pub metadata_fields: &'static [&'static str],
}

const METADATA_FIELDS: &[&str] = &[
    "method",
    "model",
    "original_length",
    "summary_length",
    "compression_ratio",
    "processing_time",
    "language",
];

impl ExportFormats {
    pub fn catalog() -> Self {
        let formats = ExportFormat::ALL
            .into_iter()
            .map(|format| {
                let (name, description, features): (_, _, &'static [&'static str]) = match format {
                    ExportFormat::Pdf => (
                        "PDF Document",
                        "Portable Document Format with paginated layout",
                        &["Bold title", "Metadata block", "Automatic pagination"],
                    ),
                    ExportFormat::Docx => (
                        "Word Document",
                        "Microsoft Word document",
                        &["Bold title", "Bold metadata keys", "One paragraph per line"],
                    ),
                    ExportFormat::Txt => (
                        "Plain Text",
                        "UTF-8 plain text file",
                        &["Markdown-style title", "Metadata lines", "Universal compatibility"],
                    ),
                    ExportFormat::Csv => (
                        "CSV File",
                        "Comma-separated values for spreadsheets",
                        &["Filename and content columns", "Metadata rows", "Spreadsheet import"],
                    ),
                };
                FormatInfo {
                    format,
                    name,
                    description,
                    mime_type: format.content_type(),
                    extension: format.extension(),
                    features,
                }
            })
            .collect();

        Self {
            formats,
            metadata_fields: METADATA_FIELDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(format: &str) -> ExportRequest {
        serde_json::from_value(json!({
            "content": "A summary worth keeping.",
            "filename": "weekly report",
            "format": format,
            "include_metadata": true,
            "metadata": { "model": "bart" }
        }))
        .unwrap()
    }

    #[test]
    fn test_render_every_format() {
        for format in ExportFormat::ALL {
            let doc = render(&request(format.extension())).unwrap();
            assert!(!doc.bytes.is_empty());
            assert_eq!(doc.format, format);
            assert_eq!(doc.file_name(), format!("weekly report.{}", format.extension()));
        }
    }

    #[test]
    fn test_render_txt_content() {
        let doc = render(&request("txt")).unwrap();
        assert_eq!(
            String::from_utf8(doc.bytes).unwrap(),
            "# weekly report\n\nmodel: bart\n\nA summary worth keeping."
        );
    }

    #[test]
    fn test_render_unknown_format() {
        let result = render(&request("rtf"));
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_formats_catalog() {
        let catalog = ExportFormats::catalog();
        assert_eq!(catalog.formats.len(), 4);
        assert_eq!(catalog.formats[0].mime_type, "application/pdf");
        assert!(catalog.metadata_fields.contains(&"compression_ratio"));
    }
}
