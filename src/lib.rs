//! Summarizer Server
//!
//! Text summarization over HTTP: extractive, abstractive and hybrid
//! summaries backed by transformer models or hosted LLM APIs, plus document
//! upload with text extraction and export of summaries to PDF, DOCX, TXT and
//! CSV.
//!
//! # Modules
//!
//! - `summarizer`: validation, provider dispatch and the model catalog
//! - `text`: preprocessing, sentence splitting and document text extraction
//! - `export`: document rendering
//! - `routes`: HTTP handlers

pub mod config;
pub mod error;
pub mod export;
pub mod routes;
pub mod state;
pub mod summarizer;
pub mod text;

use axum::{http::HeaderValue, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::CorsConfig;
use state::AppState;

/// Routes shared by the root and the `/api/v1` mirror
fn api_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::summarize::router())
        .merge(routes::files::router(max_upload_bytes))
        .merge(routes::export::router())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config().limits.max_upload_bytes;
    let cors = cors_layer(&state.config().cors);

    Router::new()
        .merge(api_router(max_upload_bytes))
        .nest("/api/v1", api_router(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
