//! Summarization types

use serde::{Deserialize, Serialize};

use crate::text::word_count;

/// How the summary is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationMethod {
    /// Select existing sentences from the source
    Extractive,
    /// Generate new sentences paraphrasing the source
    Abstractive,
    /// Extractive selection followed by abstractive rewriting
    Hybrid,
}

impl SummarizationMethod {
    pub const ALL: [SummarizationMethod; 3] = [Self::Extractive, Self::Abstractive, Self::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extractive => "extractive",
            Self::Abstractive => "abstractive",
            Self::Hybrid => "hybrid",
        }
    }
}

impl Default for SummarizationMethod {
    fn default() -> Self {
        Self::Hybrid
    }
}

/// Which backing model or API produces the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationModel {
    Bart,
    T5,
    Pegasus,
    #[serde(rename = "openai")]
    OpenAI,
    Cohere,
}

impl SummarizationModel {
    pub const ALL: [SummarizationModel; 5] = [
        Self::Bart,
        Self::T5,
        Self::Pegasus,
        Self::OpenAI,
        Self::Cohere,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bart => "bart",
            Self::T5 => "t5",
            Self::Pegasus => "pegasus",
            Self::OpenAI => "openai",
            Self::Cohere => "cohere",
        }
    }

    /// Sequence-to-sequence models served by an inference endpoint
    pub fn is_transformer(&self) -> bool {
        matches!(self, Self::Bart | Self::T5 | Self::Pegasus)
    }
}

impl Default for SummarizationModel {
    fn default() -> Self {
        Self::Bart
    }
}

impl std::fmt::Display for SummarizationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for SummarizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Bounds
// ============================================================================

pub const MIN_TEXT_CHARS: usize = 50;
pub const MAX_SENTENCES_RANGE: (i64, i64) = (1, 20);
pub const MAX_LENGTH_RANGE: (i64, i64) = (50, 500);
pub const MIN_LENGTH_RANGE: (i64, i64) = (10, 200);

fn default_max_sentences() -> i64 {
    5
}

fn default_max_length() -> i64 {
    150
}

fn default_min_length() -> i64 {
    50
}

fn default_language() -> String {
    "english".to_string()
}

// ============================================================================
// Request / Result
// ============================================================================

/// A single summarization request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationRequest {
    pub text: String,
    #[serde(default)]
    pub method: SummarizationMethod,
    #[serde(default)]
    pub model: SummarizationModel,
    /// Maximum number of sentences in the summary
    #[serde(default = "default_max_sentences")]
    pub max_sentences: i64,
    /// Word cap
    #[serde(default = "default_max_length")]
    pub max_length: i64,
    /// Word floor
    #[serde(default = "default_min_length")]
    pub min_length: i64,
    #[serde(default = "default_language")]
    pub language: String,
}

impl SummarizationRequest {
    /// Request with default method, model and bounds
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            method: SummarizationMethod::default(),
            model: SummarizationModel::default(),
            max_sentences: default_max_sentences(),
            max_length: default_max_length(),
            min_length: default_min_length(),
            language: default_language(),
        }
    }

    pub fn with_method(mut self, method: SummarizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_model(mut self, model: SummarizationModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_sentences(mut self, max_sentences: i64) -> Self {
        self.max_sentences = max_sentences;
        self
    }

    /// Provider hints; bounds are expected to be validated already
    pub fn params(&self) -> SummaryParams {
        let to_usize = |value: i64| usize::try_from(value).unwrap_or(0);
        SummaryParams {
            max_sentences: to_usize(self.max_sentences),
            max_length: to_usize(self.max_length),
            min_length: to_usize(self.min_length),
            language: self.language.clone(),
        }
    }
}

/// Length and language hints handed to a provider
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryParams {
    pub max_sentences: usize,
    pub max_length: usize,
    pub min_length: usize,
    pub language: String,
}

/// Summary plus statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizationResult {
    pub summary: String,
    pub method: SummarizationMethod,
    pub model: SummarizationModel,
    /// Word count of the input text
    pub original_length: usize,
    /// Word count of the summary
    pub summary_length: usize,
    /// `summary_length / original_length`, 0 for empty input
    pub compression_ratio: f64,
    /// Seconds spent producing the summary
    pub processing_time: f64,
}

impl SummarizationResult {
    pub fn new(
        summary: String,
        request: &SummarizationRequest,
        processing_time: f64,
    ) -> Self {
        let original_length = word_count(&request.text);
        let summary_length = word_count(&summary);

        Self {
            summary,
            method: request.method,
            model: request.model,
            original_length,
            summary_length,
            compression_ratio: compression_ratio(summary_length, original_length),
            processing_time,
        }
    }
}

/// Ratio of summary words to original words, 0 when the original is empty
pub fn compression_ratio(summary_length: usize, original_length: usize) -> f64 {
    if original_length == 0 {
        0.0
    } else {
        summary_length as f64 / original_length as f64
    }
}

/// Several texts summarized with the same settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummarizationRequest {
    pub texts: Vec<String>,
    #[serde(default)]
    pub method: SummarizationMethod,
    #[serde(default)]
    pub model: SummarizationModel,
    #[serde(default = "default_max_sentences")]
    pub max_sentences: i64,
    #[serde(default = "default_max_length")]
    pub max_length: i64,
    #[serde(default = "default_min_length")]
    pub min_length: i64,
    #[serde(default = "default_language")]
    pub language: String,
}

impl BatchSummarizationRequest {
    /// Expand into one single-item request per text
    pub fn item_requests(&self) -> Vec<SummarizationRequest> {
        self.texts
            .iter()
            .map(|text| SummarizationRequest {
                text: text.clone(),
                method: self.method,
                model: self.model,
                max_sentences: self.max_sentences,
                max_length: self.max_length,
                min_length: self.min_length,
                language: self.language.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummarizationResult {
    pub results: Vec<SummarizationResult>,
    pub total_processing_time: f64,
}
