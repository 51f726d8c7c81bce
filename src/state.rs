//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::summarizer::SummarizerService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    summarizer: SummarizerService,
}

impl AppState {
    pub fn new(config: Config, summarizer: SummarizerService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, summarizer }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the summarization service
    pub fn summarizer(&self) -> &SummarizerService {
        &self.inner.summarizer
    }
}
