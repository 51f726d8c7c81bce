//! Summary providers
//!
//! Defines the provider trait and implementations for the backing models:
//! OpenAI and Cohere over their public APIs, the transformer models over an
//! inference endpoint, and a local extractive stand-in.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::extractive;
use super::types::SummaryParams;

/// Provider failures
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request to {provider} failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
    },
}

/// A backend that turns text into a summary
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Short provider name used in logs and the model catalog
    fn name(&self) -> &'static str;

    /// Whether the provider can take requests
    fn is_available(&self) -> bool {
        true
    }

    /// Summarize `text` within the given length hints
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ProviderError>;
}

/// Shared HTTP client for all remote providers
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}

/// Send a JSON POST and decode the JSON reply, mapping failures per provider
async fn post_json<T: for<'de> Deserialize<'de>>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
    body: &Value,
) -> Result<T, ProviderError> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Transport {
            provider,
            message: e.to_string(),
        })?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            provider,
            status,
            body,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse {
            provider,
            message: e.to_string(),
        })
}

// ============================================================================
// OpenAI
// ============================================================================

/// OpenAI Chat Completions provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn prompt(text: &str, params: &SummaryParams) -> String {
        format!(
            "Please summarize the following text in {} sentences or less.\n\
             The summary should be between {} and {} words.\n\
             Write the summary in {}.\n\n\
             Text to summarize:\n{}\n\nSummary:",
            params.max_sentences, params.min_length, params.max_length, params.language, text
        )
    }

    fn request_body(&self, text: &str, params: &SummaryParams) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": Self::prompt(text, params) }],
            "max_tokens": params.max_length * 2,
            "temperature": 0.3,
        })
    }

    fn summary_from(response: ChatCompletionResponse) -> Result<String, ProviderError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "openai",
                message: "response contained no message content".to_string(),
            })
    }
}

#[async_trait]
impl SummaryProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key);

        let response: ChatCompletionResponse =
            post_json(self.name(), request, &self.request_body(text, params)).await?;
        Self::summary_from(response)
    }
}

// ============================================================================
// Cohere
// ============================================================================

/// Cohere summarize provider
pub struct CohereProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct CohereSummarizeResponse {
    summary: String,
}

impl CohereProvider {
    pub fn new(client: reqwest::Client, api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "text": text,
            "length": "auto",
            "format": "paragraph",
            "model": self.model,
            "temperature": 0.3,
        })
    }
}

#[async_trait]
impl SummaryProvider for CohereProvider {
    fn name(&self) -> &'static str {
        "cohere"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn summarize(&self, text: &str, _params: &SummaryParams) -> Result<String, ProviderError> {
        let request = self
            .client
            .post(format!("{}/v1/summarize", self.base_url))
            .bearer_auth(&self.api_key);

        let response: CohereSummarizeResponse =
            post_json(self.name(), request, &self.request_body(text)).await?;
        Ok(response.summary.trim().to_string())
    }
}

// ============================================================================
// Inference endpoint (BART, T5, PEGASUS)
// ============================================================================

/// Sequence-to-sequence model behind a Hugging Face style inference endpoint
pub struct InferenceProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    model_id: String,
    task_prefix: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    summary_text: Option<String>,
    generated_text: Option<String>,
}

impl InferenceProvider {
    pub fn new(client: reqwest::Client, base_url: &str, token: Option<&str>, model_id: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            model_id: model_id.to_string(),
            task_prefix: None,
        }
    }

    /// Prefix prepended to every input (T5 expects `summarize: `)
    pub fn with_task_prefix(mut self, prefix: &'static str) -> Self {
        self.task_prefix = Some(prefix);
        self
    }

    fn request_body(&self, text: &str, params: &SummaryParams) -> Value {
        let inputs = match self.task_prefix {
            Some(prefix) => format!("{}{}", prefix, text),
            None => text.to_string(),
        };
        json!({
            "inputs": inputs,
            "parameters": {
                "max_length": params.max_length,
                "min_length": params.min_length,
                "do_sample": false,
            },
            "options": { "wait_for_model": true },
        })
    }

    fn summary_from(outputs: Vec<InferenceOutput>) -> Result<String, ProviderError> {
        outputs
            .into_iter()
            .next()
            .and_then(|out| out.summary_text.or(out.generated_text))
            .map(|text| text.trim().to_string())
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "inference",
                message: "response contained no summary_text".to_string(),
            })
    }
}

#[async_trait]
impl SummaryProvider for InferenceProvider {
    fn name(&self) -> &'static str {
        "inference"
    }

    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ProviderError> {
        let mut request = self
            .client
            .post(format!("{}/{}", self.base_url, self.model_id));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let outputs: Vec<InferenceOutput> =
            post_json(self.name(), request, &self.request_body(text, params)).await?;
        Self::summary_from(outputs)
    }
}

// ============================================================================
// Local
// ============================================================================

/// Offline stand-in for the transformer models.
///
/// Answers with the centrality-ranked extractive summary.
#[derive(Debug, Default)]
pub struct LocalProvider;

#[async_trait]
impl SummaryProvider for LocalProvider {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, ProviderError> {
        Ok(extractive::summarize(text, params.max_sentences, params.max_length))
    }
}
