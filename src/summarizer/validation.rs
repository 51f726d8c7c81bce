//! Request validation
//!
//! Runs before any provider is contacted. Each failure names the field that
//! broke its constraint.

use serde::Serialize;
use thiserror::Error;

use super::types::{
    BatchSummarizationRequest, SummarizationRequest, MAX_LENGTH_RANGE, MAX_SENTENCES_RANGE,
    MIN_LENGTH_RANGE, MIN_TEXT_CHARS,
};

/// A rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn check_range(field: &str, value: i64, (min, max): (i64, i64)) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("{} must be between {} and {} (got {})", field, min, max, value),
        ));
    }
    Ok(())
}

fn check_text(field: &str, text: &str, label: &str) -> Result<(), ValidationError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(ValidationError::new(
            field,
            format!("{} must be at least {} characters long", label, MIN_TEXT_CHARS),
        ));
    }
    Ok(())
}

fn check_bounds(max_sentences: i64, max_length: i64, min_length: i64) -> Result<(), ValidationError> {
    check_range("max_sentences", max_sentences, MAX_SENTENCES_RANGE)?;
    check_range("max_length", max_length, MAX_LENGTH_RANGE)?;
    check_range("min_length", min_length, MIN_LENGTH_RANGE)?;

    if min_length > max_length {
        return Err(ValidationError::new(
            "min_length",
            format!(
                "min_length ({}) must not exceed max_length ({})",
                min_length, max_length
            ),
        ));
    }
    Ok(())
}

/// Validate a single summarization request
pub fn validate_request(request: &SummarizationRequest) -> Result<(), ValidationError> {
    check_text("text", &request.text, "Text")?;
    check_bounds(request.max_sentences, request.max_length, request.min_length)
}

/// Validate a batch request and every text in it
pub fn validate_batch(
    request: &BatchSummarizationRequest,
    max_batch_size: usize,
) -> Result<(), ValidationError> {
    if request.texts.is_empty() {
        return Err(ValidationError::new("texts", "At least one text is required"));
    }
    if request.texts.len() > max_batch_size {
        return Err(ValidationError::new(
            "texts",
            format!("Maximum {} texts allowed per batch request", max_batch_size),
        ));
    }

    for (i, text) in request.texts.iter().enumerate() {
        check_text(&format!("texts[{}]", i), text, &format!("Text {}", i + 1))?;
    }

    check_bounds(request.max_sentences, request.max_length, request.min_length)
}
