//! Error types for the Summarizer server

use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::export::ExportError;
use crate::summarizer::{SummarizationModel, SummarizeError, ValidationError};
use crate::text::ExtractError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File too large: {size} bytes (maximum {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Model {0} is not available")]
    ModelUnavailable(SummarizationModel),

    #[error("Summarization with {model} failed: {message}")]
    Upstream {
        model: SummarizationModel,
        message: String,
    },

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SummarizeError> for AppError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Validation(e) => AppError::Validation(e),
            SummarizeError::ModelUnavailable(model) => AppError::ModelUnavailable(model),
            SummarizeError::Upstream { model, source } => AppError::Upstream {
                model,
                message: source.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, error_type, message) = match &self {
            AppError::Validation(e) => {
                field = Some(e.field.clone());
                (StatusCode::BAD_REQUEST, "validation_error", e.message.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::PayloadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                self.to_string(),
            ),
            AppError::ModelUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "model_unavailable",
                self.to_string(),
            ),
            AppError::Upstream { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream_error", self.to_string())
            }
            AppError::Extraction(e) => match e {
                ExtractError::UnsupportedType(_) => {
                    (StatusCode::BAD_REQUEST, "unsupported_file_type", e.to_string())
                }
                _ => {
                    tracing::warn!("Text extraction failed: {}", e);
                    (StatusCode::UNPROCESSABLE_ENTITY, "extraction_error", e.to_string())
                }
            },
            AppError::Export(e) => match e {
                ExportError::UnsupportedFormat(_) => {
                    (StatusCode::BAD_REQUEST, "unsupported_format", e.to_string())
                }
                _ => {
                    tracing::error!("Export error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "export_error",
                        "Failed to render export".to_string(),
                    )
                }
            },
            AppError::Multipart(e) => (e.status(), "multipart_error", e.body_text()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            field,
            details: if cfg!(debug_assertions) && status.is_server_error() {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::ProviderError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ValidationError::new("text", "Text must be at least 50 characters long").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::PayloadTooLarge { size: 11, max: 10 }),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of(ExtractError::UnsupportedType("image/png".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ExtractError::Pdf("bad xref".to_string()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ExportError::UnsupportedFormat("rtf".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_summarize_error_conversion() {
        let unavailable: AppError = SummarizeError::ModelUnavailable(SummarizationModel::OpenAI).into();
        assert_eq!(status_of(unavailable), StatusCode::SERVICE_UNAVAILABLE);

        let upstream: AppError = SummarizeError::Upstream {
            model: SummarizationModel::Cohere,
            source: ProviderError::Api {
                provider: "cohere",
                status: 429,
                body: "rate limited".to_string(),
            },
        }
        .into();
        assert!(upstream.to_string().contains("rate limited"));
        assert_eq!(status_of(upstream), StatusCode::BAD_GATEWAY);
    }
}
