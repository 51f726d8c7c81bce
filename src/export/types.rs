//! Export types

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported format. Use: pdf, docx, txt, csv")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Txt,
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Pdf, Self::Docx, Self::Txt, Self::Csv];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Csv => "csv",
        }
    }

    /// Media type used for downloads
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Txt => "text/plain; charset=utf-8",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

pub const DEFAULT_FILENAME: &str = "summary";
const MAX_FILENAME_CHARS: usize = 100;

/// Request to export content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub content: String,
    /// Output filename without extension
    #[serde(default)]
    pub filename: Option<String>,
    /// One of pdf, docx, txt, csv; parsed late so bad values get a clear error
    pub format: String,
    #[serde(default)]
    pub include_metadata: bool,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl ExportRequest {
    pub fn format(&self) -> Result<ExportFormat, ExportError> {
        self.format.parse()
    }

    /// Sanitized filename stem
    pub fn filename(&self) -> String {
        sanitize_filename(self.filename.as_deref().unwrap_or(DEFAULT_FILENAME))
    }

    /// Metadata as display strings, sorted by key; empty unless requested
    pub fn metadata_entries(&self) -> Vec<(String, String)> {
        if !self.include_metadata {
            return Vec::new();
        }
        let mut entries: Vec<(String, String)> = self
            .metadata
            .iter()
            .flatten()
            .map(|(key, value)| (key.clone(), display_value(value)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Strings render bare, everything else as JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Reduce a user-supplied name to a safe filename stem
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_start_matches('.').trim();

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Rendered export ready to be sent
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    /// Filename stem, without extension
    pub filename: String,
}

impl ExportedDocument {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }

    /// `Content-Disposition` value with an RFC 5987 encoded fallback
    pub fn content_disposition(&self) -> String {
        let file_name = self.file_name();
        let ascii: String = file_name
            .chars()
            .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
            .collect();
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii,
            urlencoding::encode(&file_name)
        )
    }
}
