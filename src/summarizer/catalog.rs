//! Model and method catalog served by `GET /models`

use serde::Serialize;

use super::service::SummarizerService;
use super::types::{SummarizationMethod, SummarizationModel};

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: SummarizationModel,
    pub name: &'static str,
    pub description: &'static str,
    /// Kind of summaries the model produces natively
    pub kind: &'static str,
    pub max_input_length: usize,
    pub languages: &'static [&'static str],
    pub best_for: &'static str,
    pub requires_api_key: bool,
    /// Whether a usable provider is registered for this model
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub id: SummarizationMethod,
    pub name: &'static str,
    pub description: &'static str,
    pub speed: &'static str,
    pub quality: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelPair {
    pub method: SummarizationMethod,
    pub model: SummarizationModel,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    pub models: Vec<ModelInfo>,
    pub methods: Vec<MethodInfo>,
    /// Every supported method/model combination
    pub pairs: Vec<ModelPair>,
}

fn describe_model(model: SummarizationModel) -> ModelInfo {
    let (name, description, max_input_length, languages, best_for): (
        &'static str,
        &'static str,
        usize,
        &'static [&'static str],
        &'static str,
    ) = match model {
        SummarizationModel::Bart => (
            "BART",
            "Facebook's BART model for abstractive summarization",
            1024,
            &["english"],
            "General purpose summarization",
        ),
        SummarizationModel::T5 => (
            "T5",
            "Google's T5 model for text-to-text tasks",
            512,
            &["english"],
            "Short to medium texts",
        ),
        SummarizationModel::Pegasus => (
            "PEGASUS",
            "Google's PEGASUS model optimized for summarization",
            1024,
            &["english"],
            "Long documents and news articles",
        ),
        SummarizationModel::OpenAI => (
            "OpenAI GPT",
            "OpenAI's GPT models for high-quality summarization",
            4096,
            &["english", "spanish", "french", "german", "chinese"],
            "High-quality, nuanced summaries",
        ),
        SummarizationModel::Cohere => (
            "Cohere",
            "Cohere's command model for summarization",
            4096,
            &["english"],
            "Business and technical documents",
        ),
    };

    ModelInfo {
        id: model,
        name,
        description,
        kind: "abstractive",
        max_input_length,
        languages,
        best_for,
        requires_api_key: !model.is_transformer(),
        available: false,
        provider: None,
    }
}

fn describe_method(method: SummarizationMethod) -> MethodInfo {
    let (name, description, speed, quality) = match method {
        SummarizationMethod::Extractive => (
            "Extractive",
            "Selects important sentences from original text",
            "Fast",
            "Good",
        ),
        SummarizationMethod::Abstractive => (
            "Abstractive",
            "Generates new sentences that capture the meaning",
            "Medium",
            "Excellent",
        ),
        SummarizationMethod::Hybrid => (
            "Hybrid",
            "Combines extractive and abstractive methods",
            "Medium",
            "Excellent",
        ),
    };

    MethodInfo {
        id: method,
        name,
        description,
        speed,
        quality,
    }
}

impl ModelCatalog {
    /// Build the catalog, marking models that have a provider
    pub fn for_service(service: &SummarizerService) -> Self {
        let models = SummarizationModel::ALL
            .into_iter()
            .map(|model| {
                ModelInfo {
                    available: service.is_model_available(model),
                    provider: service.provider_name(model),
                    ..describe_model(model)
                }
            })
            .collect();

        let methods = SummarizationMethod::ALL.into_iter().map(describe_method).collect();

        let pairs = SummarizationMethod::ALL
            .into_iter()
            .flat_map(|method| {
                SummarizationModel::ALL
                    .into_iter()
                    .map(move |model| ModelPair { method, model })
            })
            .collect();

        Self {
            models,
            methods,
            pairs,
        }
    }
}
