//! Configuration management for the Summarizer server

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub cors: CorsConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
    /// Maximum number of texts in one batch request
    pub max_batch_size: usize,
    /// Number of batch items summarized concurrently
    pub batch_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvidersConfig {
    pub openai: OpenAiConfig,
    pub cohere: CohereConfig,
    pub model_server: ModelServerConfig,
    /// Timeout applied to every outbound provider request
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Inference endpoint serving the transformer models (BART, T5, PEGASUS)
#[derive(Debug, Clone, Deserialize)]
pub struct ModelServerConfig {
    /// Base URL; when unset the local extractive provider stands in
    pub url: Option<String>,
    pub token: Option<String>,
    pub bart_model: String,
    pub t5_model: String,
    pub pegasus_model: String,
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            limits: LimitsConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                max_batch_size: DEFAULT_MAX_BATCH_SIZE,
                batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            providers: ProvidersConfig {
                openai: OpenAiConfig {
                    api_key: None,
                    base_url: "https://api.openai.com/v1".to_string(),
                    model: "gpt-3.5-turbo".to_string(),
                },
                cohere: CohereConfig {
                    api_key: None,
                    base_url: "https://api.cohere.ai".to_string(),
                    model: "command".to_string(),
                },
                model_server: ModelServerConfig {
                    url: None,
                    token: None,
                    bart_model: "facebook/bart-large-cnn".to_string(),
                    t5_model: "t5-base".to_string(),
                    pegasus_model: "google/pegasus-cnn_dailymail".to_string(),
                },
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_or("SERVER_PORT", var("SERVER_PORT"), DEFAULT_PORT)?,
            },
            limits: LimitsConfig {
                max_upload_bytes: parse_or(
                    "MAX_UPLOAD_BYTES",
                    var("MAX_UPLOAD_BYTES"),
                    DEFAULT_MAX_UPLOAD_BYTES,
                )?,
                max_batch_size: parse_or(
                    "MAX_BATCH_SIZE",
                    var("MAX_BATCH_SIZE"),
                    DEFAULT_MAX_BATCH_SIZE,
                )?,
                batch_concurrency: parse_or(
                    "BATCH_CONCURRENCY",
                    var("BATCH_CONCURRENCY"),
                    DEFAULT_BATCH_CONCURRENCY,
                )?
                .max(1),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ORIGINS")
                    .map(|origins| {
                        origins
                            .split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            providers: ProvidersConfig {
                openai: OpenAiConfig {
                    api_key: var("OPENAI_API_KEY"),
                    base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.providers.openai.base_url),
                    model: var("OPENAI_MODEL").unwrap_or(defaults.providers.openai.model),
                },
                cohere: CohereConfig {
                    api_key: var("COHERE_API_KEY"),
                    base_url: var("COHERE_BASE_URL").unwrap_or(defaults.providers.cohere.base_url),
                    model: var("COHERE_MODEL").unwrap_or(defaults.providers.cohere.model),
                },
                model_server: ModelServerConfig {
                    url: var("MODEL_SERVER_URL"),
                    token: var("MODEL_SERVER_TOKEN"),
                    bart_model: var("BART_MODEL_ID")
                        .unwrap_or(defaults.providers.model_server.bart_model),
                    t5_model: var("T5_MODEL_ID").unwrap_or(defaults.providers.model_server.t5_model),
                    pegasus_model: var("PEGASUS_MODEL_ID")
                        .unwrap_or(defaults.providers.model_server.pegasus_model),
                },
                request_timeout_secs: parse_or(
                    "REQUEST_TIMEOUT_SECS",
                    var("REQUEST_TIMEOUT_SECS"),
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.limits.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.limits.max_batch_size, 10);
        assert!(config.providers.openai.api_key.is_none());
        assert!(config.providers.model_server.url.is_none());
        assert!(config.cors.allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SERVER_PORT", "8080"),
            ("OPENAI_API_KEY", "sk-test"),
            ("MODEL_SERVER_URL", "http://localhost:8000/models"),
            ("CORS_ORIGINS", "http://localhost:3000, http://127.0.0.1:3000,"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.providers.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(
            config.providers.model_server.url.as_deref(),
            Some("http://localhost:8000/models")
        );
        assert_eq!(config.cors.allowed_origins.len(), 2);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.providers.openai.api_key.is_none());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let result = Config::from_lookup(lookup(&[("SERVER_PORT", "not-a-port")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "SERVER_PORT", .. })
        ));
    }

    #[test]
    fn test_batch_concurrency_is_at_least_one() {
        let config = Config::from_lookup(lookup(&[("BATCH_CONCURRENCY", "0")])).unwrap();
        assert_eq!(config.limits.batch_concurrency, 1);
    }
}
