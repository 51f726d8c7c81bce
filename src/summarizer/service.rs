//! Summarization service
//!
//! Validates requests, routes them to the provider registered for the
//! requested model and measures the result.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt, TryStreamExt};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use super::extractive;
use super::provider::{
    http_client, CohereProvider, InferenceProvider, LocalProvider, OpenAiProvider, ProviderError,
    SummaryProvider,
};
use super::types::{
    BatchSummarizationRequest, BatchSummarizationResult, SummarizationMethod, SummarizationModel,
    SummarizationRequest, SummarizationResult, SummaryParams,
};
use super::validation::{validate_batch, validate_request, ValidationError};
use crate::config::{Config, DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_BATCH_SIZE};
use crate::text::{chunk_text, preprocess, word_count};

/// Inputs longer than this many characters are summarized chunk by chunk
pub const MAX_CHUNK_CHARS: usize = 1024;

/// Summarization failures
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Model {0} is not available")]
    ModelUnavailable(SummarizationModel),

    #[error("Summarization with {model} failed: {source}")]
    Upstream {
        model: SummarizationModel,
        #[source]
        source: ProviderError,
    },
}

/// Routes summarization requests to model providers
pub struct SummarizerService {
    providers: HashMap<SummarizationModel, Arc<dyn SummaryProvider>>,
    max_batch_size: usize,
    batch_concurrency: usize,
}

impl Default for SummarizerService {
    fn default() -> Self {
        Self::new()
    }
}

impl SummarizerService {
    /// Service with no providers registered
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Register providers according to configuration.
    ///
    /// Transformer models use the inference endpoint when one is configured
    /// and the local extractive provider otherwise. OpenAI and Cohere are only
    /// registered when an API key is present.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let providers = &config.providers;
        let client = http_client(providers.request_timeout_secs)?;
        let mut service = Self::new()
            .with_batch_limits(config.limits.max_batch_size, config.limits.batch_concurrency);

        match &providers.model_server.url {
            Some(url) => {
                let server = &providers.model_server;
                let token = server.token.as_deref();
                service = service
                    .with_provider(
                        SummarizationModel::Bart,
                        Arc::new(InferenceProvider::new(client.clone(), url, token, &server.bart_model)),
                    )
                    .with_provider(
                        SummarizationModel::T5,
                        Arc::new(
                            InferenceProvider::new(client.clone(), url, token, &server.t5_model)
                                .with_task_prefix("summarize: "),
                        ),
                    )
                    .with_provider(
                        SummarizationModel::Pegasus,
                        Arc::new(InferenceProvider::new(
                            client.clone(),
                            url,
                            token,
                            &server.pegasus_model,
                        )),
                    );
                tracing::info!("Transformer models served by {}", url);
            }
            None => {
                let local: Arc<dyn SummaryProvider> = Arc::new(LocalProvider);
                for model in [
                    SummarizationModel::Bart,
                    SummarizationModel::T5,
                    SummarizationModel::Pegasus,
                ] {
                    service = service.with_provider(model, local.clone());
                }
                tracing::warn!(
                    "MODEL_SERVER_URL not set, transformer models fall back to local extractive summaries"
                );
            }
        }

        if let Some(key) = &providers.openai.api_key {
            service = service.with_provider(
                SummarizationModel::OpenAI,
                Arc::new(OpenAiProvider::new(
                    client.clone(),
                    key,
                    &providers.openai.base_url,
                    &providers.openai.model,
                )),
            );
        }

        if let Some(key) = &providers.cohere.api_key {
            service = service.with_provider(
                SummarizationModel::Cohere,
                Arc::new(CohereProvider::new(
                    client,
                    key,
                    &providers.cohere.base_url,
                    &providers.cohere.model,
                )),
            );
        }

        Ok(service)
    }

    pub fn with_provider(mut self, model: SummarizationModel, provider: Arc<dyn SummaryProvider>) -> Self {
        self.providers.insert(model, provider);
        self
    }

    pub fn with_batch_limits(mut self, max_batch_size: usize, batch_concurrency: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self.batch_concurrency = batch_concurrency.max(1);
        self
    }

    /// Name of the provider backing a model, if any
    pub fn provider_name(&self, model: SummarizationModel) -> Option<&'static str> {
        self.providers.get(&model).map(|p| p.name())
    }

    /// Whether a usable provider is registered for the model
    pub fn is_model_available(&self, model: SummarizationModel) -> bool {
        self.providers.get(&model).is_some_and(|p| p.is_available())
    }

    /// Models with a usable provider, in catalog order
    pub fn available_models(&self) -> Vec<SummarizationModel> {
        SummarizationModel::ALL
            .into_iter()
            .filter(|model| self.is_model_available(*model))
            .collect()
    }

    fn provider(&self, model: SummarizationModel) -> Result<&Arc<dyn SummaryProvider>, SummarizeError> {
        self.providers
            .get(&model)
            .filter(|provider| provider.is_available())
            .ok_or(SummarizeError::ModelUnavailable(model))
    }

    /// Summarize a single text
    pub async fn summarize(
        &self,
        request: &SummarizationRequest,
    ) -> Result<SummarizationResult, SummarizeError> {
        validate_request(request)?;

        let span = tracing::info_span!(
            "summarize",
            request_id = %Uuid::new_v4(),
            method = %request.method,
            model = %request.model,
        );

        async move {
            let started = Instant::now();
            let summary = self.dispatch(request).await?;
            let result =
                SummarizationResult::new(summary, request, started.elapsed().as_secs_f64());

            tracing::info!(
                original_length = result.original_length,
                summary_length = result.summary_length,
                processing_time = result.processing_time,
                "Summary generated"
            );
            Ok::<_, SummarizeError>(result)
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, request: &SummarizationRequest) -> Result<String, SummarizeError> {
        let params = request.params();
        let model = request.model;
        let upstream = |source: ProviderError| {
            tracing::warn!(%model, error = %source, "Provider failed");
            SummarizeError::Upstream { model, source }
        };

        // API models take the raw text and handle every method themselves
        if !model.is_transformer() {
            let provider = self.provider(model)?;
            return provider.summarize(&request.text, &params).await.map_err(upstream);
        }

        let text = preprocess(&request.text);
        match request.method {
            SummarizationMethod::Extractive => Ok(extractive::summarize(
                &text,
                params.max_sentences,
                params.max_length,
            )),
            SummarizationMethod::Abstractive => {
                let provider = self.provider(model)?;
                abstractive(provider.as_ref(), &text, &params)
                    .await
                    .map_err(upstream)
            }
            SummarizationMethod::Hybrid => {
                let provider = self.provider(model)?;
                let selection = extractive::summarize(
                    &text,
                    params.max_sentences * 2,
                    params.max_length * 2,
                );
                abstractive(provider.as_ref(), &selection, &params)
                    .await
                    .map_err(upstream)
            }
        }
    }

    /// Summarize several texts with the same settings.
    ///
    /// Every text is validated before any provider is called. Results keep
    /// input order; the first failure fails the batch.
    pub async fn summarize_batch(
        &self,
        request: &BatchSummarizationRequest,
    ) -> Result<BatchSummarizationResult, SummarizeError> {
        validate_batch(request, self.max_batch_size)?;

        let started = Instant::now();
        let items = request.item_requests();
        let results: Vec<SummarizationResult> = stream::iter(
            items
                .into_iter()
                .map(|item| async move { self.summarize(&item).await }),
        )
        .buffered(self.batch_concurrency)
        .try_collect()
        .await?;

        let total_processing_time = started.elapsed().as_secs_f64();
        tracing::info!(
            items = results.len(),
            total_processing_time,
            "Batch summarization complete"
        );

        Ok(BatchSummarizationResult {
            results,
            total_processing_time,
        })
    }
}

/// Abstractive pass with chunking for long inputs.
///
/// Each chunk is summarized on its own; the joined result is summarized once
/// more when it is still longer than `max_length` words.
async fn abstractive(
    provider: &dyn SummaryProvider,
    text: &str,
    params: &SummaryParams,
) -> Result<String, ProviderError> {
    if text.chars().count() <= MAX_CHUNK_CHARS {
        return provider.summarize(text, params).await;
    }

    let chunks = chunk_text(text, MAX_CHUNK_CHARS);
    tracing::debug!(chunks = chunks.len(), "Summarizing long input in chunks");

    let mut partials = Vec::with_capacity(chunks.len());
    for chunk in &chunks {
        partials.push(provider.summarize(chunk, params).await?);
    }

    let combined = partials.join(" ");
    if word_count(&combined) > params.max_length {
        provider.summarize(&combined, params).await
    } else {
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records calls and answers with a fixed summary
    struct MockProvider {
        calls: AtomicUsize,
        inputs: std::sync::Mutex<Vec<String>>,
        response: Result<String, &'static str>,
    }

    impl MockProvider {
        fn answering(summary: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                inputs: std::sync::Mutex::new(Vec::new()),
                response: Ok(summary.to_string()),
            })
        }

        fn failing(message: &'static str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                inputs: std::sync::Mutex::new(Vec::new()),
                response: Err(message),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SummaryProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn summarize(&self, text: &str, _params: &SummaryParams) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inputs.lock().unwrap().push(text.to_string());
            match &self.response {
                Ok(summary) => Ok(summary.clone()),
                Err(message) => Err(ProviderError::Transport {
                    provider: "mock",
                    message: message.to_string(),
                }),
            }
        }
    }

    fn service_with(mock: &Arc<MockProvider>) -> SummarizerService {
        SummarizationModel::ALL
            .into_iter()
            .fold(SummarizerService::new(), |service, model| {
                service.with_provider(model, mock.clone())
            })
    }

    fn sample_text() -> String {
        "This is a test text for summarization. ".repeat(10)
    }

    #[tokio::test]
    async fn test_extractive_scenario() {
        let service = SummarizerService::new().with_provider(SummarizationModel::Bart, Arc::new(LocalProvider));
        let request = SummarizationRequest::new(sample_text())
            .with_method(SummarizationMethod::Extractive)
            .with_model(SummarizationModel::Bart)
            .with_max_sentences(3);

        let result = service.summarize(&request).await.unwrap();

        assert!(!result.summary.is_empty());
        assert_eq!(result.original_length, 70);
        assert!(result.summary_length <= result.original_length);
        assert_eq!(result.summary_length, 21);
        assert!((result.compression_ratio - 0.3).abs() < 1e-9);
        assert!(result.processing_time >= 0.0);
    }

    #[tokio::test]
    async fn test_short_text_rejected_before_provider_call() {
        let mock = MockProvider::answering("unused");
        let service = service_with(&mock);
        let request = SummarizationRequest::new("a".repeat(49))
            .with_method(SummarizationMethod::Abstractive);

        let result = service.summarize(&request).await;

        assert!(matches!(result, Err(SummarizeError::Validation(_))));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_every_pair_echoes_method_and_model() {
        let mock = MockProvider::answering("A concise summary of the text.");
        let service = service_with(&mock);

        for model in SummarizationModel::ALL {
            for method in SummarizationMethod::ALL {
                let request = SummarizationRequest::new(sample_text())
                    .with_method(method)
                    .with_model(model);
                let result = service.summarize(&request).await.unwrap();

                assert_eq!(result.method, method);
                assert_eq!(result.model, model);
                let expected = result.summary_length as f64 / result.original_length as f64;
                assert!((result.compression_ratio - expected).abs() < 1e-9);
            }
        }
    }

    #[tokio::test]
    async fn test_extractive_transformer_does_not_call_provider() {
        let mock = MockProvider::answering("unused");
        let service = service_with(&mock);
        let request = SummarizationRequest::new(sample_text())
            .with_method(SummarizationMethod::Extractive)
            .with_model(SummarizationModel::Pegasus);

        service.summarize(&request).await.unwrap();
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_models_receive_raw_text() {
        let mock = MockProvider::answering("Summary.");
        let service = service_with(&mock);
        let raw = format!("  {}  ", sample_text());
        let request = SummarizationRequest::new(raw.clone())
            .with_method(SummarizationMethod::Extractive)
            .with_model(SummarizationModel::OpenAI);

        service.summarize(&request).await.unwrap();

        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.inputs.lock().unwrap()[0], raw);
    }

    #[tokio::test]
    async fn test_hybrid_sends_extractive_selection() {
        let mock = MockProvider::answering("Summary.");
        let service = service_with(&mock);
        let request = SummarizationRequest::new(sample_text())
            .with_method(SummarizationMethod::Hybrid)
            .with_model(SummarizationModel::Bart)
            .with_max_sentences(2);

        service.summarize(&request).await.unwrap();

        let inputs = mock.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 1);
        // max_sentences * 2 sentences of 7 words
        assert_eq!(inputs[0].split_whitespace().count(), 28);
    }

    #[tokio::test]
    async fn test_long_input_is_chunked() {
        let mock = MockProvider::answering("Chunk summary.");
        let service = service_with(&mock);
        // ~3900 characters
        let text = "This sentence is padding for the chunking behaviour test. ".repeat(68);
        let request = SummarizationRequest::new(text)
            .with_method(SummarizationMethod::Abstractive)
            .with_model(SummarizationModel::T5);

        let result = service.summarize(&request).await.unwrap();

        assert!(mock.calls() >= 4);
        assert!(result.summary.starts_with("Chunk summary."));
    }

    #[tokio::test]
    async fn test_missing_provider_is_unavailable() {
        let service = SummarizerService::new();
        let request = SummarizationRequest::new(sample_text())
            .with_method(SummarizationMethod::Abstractive)
            .with_model(SummarizationModel::Cohere);

        let result = service.summarize(&request).await;
        assert!(matches!(
            result,
            Err(SummarizeError::ModelUnavailable(SummarizationModel::Cohere))
        ));
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_message() {
        let mock = MockProvider::failing("connection reset");
        let service = service_with(&mock);
        let request = SummarizationRequest::new(sample_text())
            .with_method(SummarizationMethod::Abstractive);

        let err = service.summarize(&request).await.unwrap_err();

        assert!(matches!(err, SummarizeError::Upstream { .. }));
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_keeps_order() {
        let service = SummarizerService::new().with_batch_limits(10, 3);
        let texts: Vec<String> = (0..5)
            .map(|i| format!("Document number {} talks about things. ", i).repeat(3))
            .collect();
        let request = BatchSummarizationRequest {
            texts: texts.clone(),
            method: SummarizationMethod::Extractive,
            model: SummarizationModel::Bart,
            max_sentences: 1,
            max_length: 150,
            min_length: 50,
            language: "english".to_string(),
        };

        let batch = service.summarize_batch(&request).await.unwrap();

        assert_eq!(batch.results.len(), 5);
        for (i, result) in batch.results.iter().enumerate() {
            assert_eq!(result.summary, format!("Document number {} talks about things.", i));
        }
        assert!(batch.total_processing_time >= 0.0);
    }

    #[tokio::test]
    async fn test_batch_validates_every_item_first() {
        let mock = MockProvider::answering("Summary.");
        let service = service_with(&mock);
        let request = BatchSummarizationRequest {
            texts: vec![sample_text(), "too short".to_string()],
            method: SummarizationMethod::Abstractive,
            model: SummarizationModel::Bart,
            max_sentences: 5,
            max_length: 150,
            min_length: 50,
            language: "english".to_string(),
        };

        let result = service.summarize_batch(&request).await;

        assert!(matches!(result, Err(SummarizeError::Validation(_))));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_runs_on_spawned_task() {
        let service = Arc::new(SummarizerService::new().with_batch_limits(10, 2));
        let request = BatchSummarizationRequest {
            texts: vec![sample_text(), sample_text()],
            method: SummarizationMethod::Extractive,
            model: SummarizationModel::Bart,
            max_sentences: 1,
            max_length: 150,
            min_length: 50,
            language: "english".to_string(),
        };

        let batch = tokio::spawn(async move { service.summarize_batch(&request).await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(batch.results.len(), 2);
    }

    #[test]
    fn test_from_config_without_keys() {
        let service = SummarizerService::from_config(&Config::default()).unwrap();
        assert_eq!(
            service.available_models(),
            vec![
                SummarizationModel::Bart,
                SummarizationModel::T5,
                SummarizationModel::Pegasus
            ]
        );
        assert_eq!(service.provider_name(SummarizationModel::Bart), Some("local"));
        assert_eq!(service.provider_name(SummarizationModel::OpenAI), None);
    }

    #[test]
    fn test_from_config_with_everything() {
        let mut config = Config::default();
        config.providers.openai.api_key = Some("sk-test".to_string());
        config.providers.cohere.api_key = Some("co-test".to_string());
        config.providers.model_server.url = Some("http://localhost:8000/models".to_string());

        let service = SummarizerService::from_config(&config).unwrap();

        assert_eq!(service.available_models().len(), 5);
        assert_eq!(service.provider_name(SummarizationModel::T5), Some("inference"));
        assert_eq!(service.provider_name(SummarizationModel::Cohere), Some("cohere"));
    }
}
