//! Summarization Module
//!
//! Validates summarization requests, dispatches them to the provider backing
//! the requested model and computes the result statistics.
//!
//! Providers:
//! - OpenAI Chat Completions and Cohere summarize (API key required)
//! - Inference endpoint for BART, T5 and PEGASUS
//! - Local extractive summaries when no inference endpoint is configured
//!
//! ## Usage
//!
//! ```rust,ignore
//! use summarizer_server::summarizer::{SummarizerService, SummarizationRequest};
//!
//! let service = SummarizerService::from_config(&config)?;
//! let result = service.summarize(&SummarizationRequest::new(text)).await?;
//! println!("{} ({:.2})", result.summary, result.compression_ratio);
//! ```

pub mod catalog;
pub mod extractive;
pub mod provider;
pub mod service;
pub mod types;
pub mod validation;

pub use catalog::{MethodInfo, ModelCatalog, ModelInfo, ModelPair};
pub use provider::{
    CohereProvider, InferenceProvider, LocalProvider, OpenAiProvider, ProviderError,
    SummaryProvider,
};
pub use service::{SummarizeError, SummarizerService};
pub use types::{
    compression_ratio, BatchSummarizationRequest, BatchSummarizationResult, SummarizationMethod,
    SummarizationModel, SummarizationRequest, SummarizationResult, SummaryParams,
};
pub use validation::{validate_request, ValidationError};
