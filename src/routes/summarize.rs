//! Summarization Routes
//!
//! Endpoints:
//! - POST /summarize - Summarize one text
//! - POST /summarize/batch - Summarize up to `MAX_BATCH_SIZE` texts with shared settings
//! - GET /summarize/health - Provider availability
//! - GET /models - Models, methods and supported combinations

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;
use crate::summarizer::{
    BatchSummarizationRequest, BatchSummarizationResult, ModelCatalog, SummarizationModel,
    SummarizationRequest, SummarizationResult,
};

/// Create the summarization router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(summarize))
        .route("/summarize/batch", post(summarize_batch))
        .route("/summarize/health", get(summarizer_health))
        .route("/models", get(list_models))
}

/// POST /summarize
async fn summarize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummarizationRequest>, JsonRejection>,
) -> Result<Json<SummarizationResult>> {
    let Json(request) = payload?;

    tracing::debug!(
        method = %request.method,
        model = %request.model,
        chars = request.text.chars().count(),
        "Summarization request"
    );

    let result = state.summarizer().summarize(&request).await?;
    Ok(Json(result))
}

/// POST /summarize/batch
async fn summarize_batch(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchSummarizationRequest>, JsonRejection>,
) -> Result<Json<BatchSummarizationResult>> {
    let Json(request) = payload?;

    tracing::debug!(items = request.texts.len(), "Batch summarization request");

    let result = state.summarizer().summarize_batch(&request).await?;
    Ok(Json(result))
}

#[derive(Serialize)]
struct SummarizerHealth {
    status: &'static str,
    models_loaded: usize,
    available_models: Vec<SummarizationModel>,
    service: &'static str,
}

/// GET /summarize/health
async fn summarizer_health(State(state): State<AppState>) -> Json<SummarizerHealth> {
    let available_models = state.summarizer().available_models();

    Json(SummarizerHealth {
        status: if available_models.is_empty() {
            "degraded"
        } else {
            "healthy"
        },
        models_loaded: available_models.len(),
        available_models,
        service: "summarizer",
    })
}

/// GET /models
async fn list_models(State(state): State<AppState>) -> Json<ModelCatalog> {
    Json(ModelCatalog::for_service(state.summarizer()))
}
