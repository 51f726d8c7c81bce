//! File Routes
//!
//! Endpoints:
//! - POST /files/upload - Upload a PDF, DOCX or TXT file and extract its text
//! - POST /files/process-text - Clean pasted text and report statistics
//! - GET /files/supported-formats - Accepted formats and limits

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::summarizer::ValidationError;
use crate::text::{
    detect_language, extract_text, preprocess, resolve_content_type, statistics, word_count,
    DocumentKind, ExtractError, Language, TextStatistics,
};

/// Pasted text shorter than this is rejected
const MIN_PROCESS_TEXT_CHARS: usize = 10;
/// Texts with fewer words are reported as too short to summarize
const MIN_SUMMARIZABLE_WORDS: usize = 50;
/// Headroom for multipart boundaries and headers on top of the file limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the files router
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/files/upload",
            post(upload_file)
                .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD)),
        )
        .route("/files/process-text", post(process_text))
        .route("/files/supported-formats", get(supported_formats))
}

// ============================================================================
// Upload
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub text_extracted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<TextStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "Invalid extract_text value: {}",
            other
        ))),
    }
}

/// POST /files/upload
///
/// Multipart fields: `file` (required) and `extract_text` (optional, default true).
async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let max_upload_bytes = state.config().limits.max_upload_bytes;
    let mut file = None;
    let mut extract = true;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let declared = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await?;
                file = Some((filename, declared, data));
            }
            "extract_text" => extract = parse_flag(&field.text().await?)?,
            _ => tracing::debug!("Ignoring multipart field '{}'", name),
        }
    }

    let (filename, declared, data) = file.ok_or_else(|| {
        AppError::BadRequest("No file provided. Use field name 'file'".to_string())
    })?;

    if data.len() > max_upload_bytes {
        return Err(AppError::PayloadTooLarge {
            size: data.len(),
            max: max_upload_bytes,
        });
    }

    let content_type = resolve_content_type(declared.as_deref(), Some(&filename));
    let kind = DocumentKind::from_mime(&content_type)
        .ok_or_else(|| ExtractError::UnsupportedType(content_type.clone()))?;

    tracing::info!(
        filename = %filename,
        content_type = %content_type,
        size = data.len(),
        "File uploaded"
    );

    let mut response = UploadResponse {
        filename,
        content_type: kind.mime_type().to_string(),
        size: data.len(),
        text_extracted: false,
        text: None,
        statistics: None,
        language: None,
    };

    if extract {
        let text = tokio::task::spawn_blocking(move || extract_text(kind, &data))
            .await
            .map_err(|e| AppError::Internal(format!("Extraction task failed: {}", e)))??;

        tracing::debug!(words = word_count(&text), "Text extracted");

        response.statistics = Some(statistics(&text));
        response.language = Some(detect_language(&text));
        response.text = Some(text);
        response.text_extracted = true;
    }

    Ok(Json(response))
}

// ============================================================================
// Text processing
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProcessTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ProcessTextResponse {
    pub original_text: String,
    pub processed_text: String,
    pub statistics: TextStatistics,
    pub language: Language,
    pub is_suitable_for_summarization: bool,
}

/// POST /files/process-text
async fn process_text(
    payload: std::result::Result<Json<ProcessTextRequest>, JsonRejection>,
) -> Result<Json<ProcessTextResponse>> {
    let Json(request) = payload?;

    if request.text.trim().chars().count() < MIN_PROCESS_TEXT_CHARS {
        return Err(ValidationError::new(
            "text",
            format!("Text must be at least {} characters long", MIN_PROCESS_TEXT_CHARS),
        )
        .into());
    }

    let processed_text = preprocess(&request.text);
    let statistics = statistics(&processed_text);

    Ok(Json(ProcessTextResponse {
        is_suitable_for_summarization: statistics.word_count >= MIN_SUMMARIZABLE_WORDS,
        language: detect_language(&processed_text),
        statistics,
        processed_text,
        original_text: request.text,
    }))
}

// ============================================================================
// Supported formats
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SupportedFormat {
    pub extension: &'static str,
    pub mime_type: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_file_size_mb: f64,
    pub min_text_length: usize,
}

#[derive(Debug, Serialize)]
pub struct SupportedFormatsResponse {
    pub formats: Vec<SupportedFormat>,
    pub limitations: UploadLimits,
    pub recommendations: Vec<&'static str>,
}

/// GET /files/supported-formats
async fn supported_formats(State(state): State<AppState>) -> Json<SupportedFormatsResponse> {
    let max_bytes = state.config().limits.max_upload_bytes;

    let formats = [DocumentKind::Pdf, DocumentKind::Docx, DocumentKind::Txt]
        .into_iter()
        .map(|kind| {
            let (extension, description) = match kind {
                DocumentKind::Pdf => (".pdf", "Portable Document Format, text layer only"),
                DocumentKind::Docx => (".docx", "Microsoft Word document"),
                DocumentKind::Txt => (".txt", "Plain text, UTF-8 or Latin-1"),
            };
            SupportedFormat {
                extension,
                mime_type: kind.mime_type(),
                description,
            }
        })
        .collect();

    Json(SupportedFormatsResponse {
        formats,
        limitations: UploadLimits {
            max_file_size_bytes: max_bytes,
            max_file_size_mb: max_bytes as f64 / (1024.0 * 1024.0),
            min_text_length: crate::summarizer::types::MIN_TEXT_CHARS,
        },
        recommendations: vec![
            "Scanned PDFs without a text layer yield no text",
            "Texts of at least 50 words give the best summaries",
            "Split very long documents into sections for more focused summaries",
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" 1 ").unwrap());
        assert!(!parse_flag("False").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_upload_response_omits_missing_text() {
        let response = UploadResponse {
            filename: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            size: 11,
            text_extracted: false,
            text: None,
            statistics: None,
            language: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 4);
        assert_eq!(json["text_extracted"], false);
    }
}
