//! Export Routes
//!
//! Endpoints:
//! - POST /export - Render content as a PDF, DOCX, TXT or CSV download
//! - GET /export/formats - Available formats and common metadata fields

use axum::{
    body::Body,
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::export::{self, ExportFormats, ExportRequest};
use crate::state::AppState;

/// Create the export router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export", post(export_document))
        .route("/export/formats", get(list_formats))
}

/// POST /export
async fn export_document(
    payload: std::result::Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response> {
    let Json(request) = payload?;

    let document = tokio::task::spawn_blocking(move || export::render(&request))
        .await
        .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

    tracing::info!(
        file = %document.file_name(),
        bytes = document.bytes.len(),
        "Export rendered"
    );

    let content_disposition = document.content_disposition();
    let content_length = document.bytes.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.content_type())
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CONTENT_DISPOSITION, content_disposition)
        .body(Body::from(document.bytes))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// GET /export/formats
async fn list_formats() -> Json<ExportFormats> {
    Json(ExportFormats::catalog())
}
