//! Fluent builder for `ResearchConfig`
//!
//! All fields have defaults, so `ResearchConfig::builder().build()` is valid.
//! `build()` validates the values that would otherwise fail deep inside a run.

use std::path::{Path, PathBuf};

use url::Url;

use super::types::ResearchConfig;
use crate::error::{ResearchError, ResearchResult};

#[derive(Debug, Clone, Default)]
pub struct ResearchConfigBuilder {
    config: ResearchConfig,
}

impl ResearchConfig {
    /// Create a builder for configuring a `ResearchConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::default()
    }

    /// Load a config from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> ResearchResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: ResearchConfig = serde_json::from_str(&raw)?;
        ResearchConfigBuilder { config }.build()
    }

    /// Turn an existing config back into a builder for overrides
    #[must_use]
    pub fn into_builder(self) -> ResearchConfigBuilder {
        ResearchConfigBuilder { config: self }
    }
}

impl ResearchConfigBuilder {
    #[must_use]
    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama_url = url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn ollama_model(mut self, model: impl Into<String>) -> Self {
        self.config.ollama_model = model.into();
        self
    }

    #[must_use]
    pub fn reasoning_model(mut self, model: impl Into<String>) -> Self {
        self.config.reasoning_model = model.into();
        self
    }

    #[must_use]
    pub fn llm_timeout_secs(mut self, secs: u64) -> Self {
        self.config.llm_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn script_timeout_secs(mut self, secs: u64) -> Self {
        self.config.script_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn blocked_sites(mut self, sites: Vec<String>) -> Self {
        self.config.blocked_sites = sites;
        self
    }

    #[must_use]
    pub fn search_engine_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_engine_url = url.into();
        self
    }

    #[must_use]
    pub fn acceptance_threshold(mut self, chars: usize) -> Self {
        self.config.acceptance_threshold = chars;
        self
    }

    #[must_use]
    pub fn candidate_slack(mut self, slack: usize) -> Self {
        self.config.candidate_slack = slack;
        self
    }

    #[must_use]
    pub fn capture_screenshots(mut self, capture: bool) -> Self {
        self.config.capture_screenshots = capture;
        self
    }

    #[must_use]
    pub fn settle_delays_ms(mut self, navigation_cap: u64, search_cap: u64, visit: u64, tab: u64) -> Self {
        self.config.navigation_settle_cap_ms = navigation_cap;
        self.config.search_settle_cap_ms = search_cap;
        self.config.visit_settle_ms = visit;
        self.config.tab_settle_ms = tab;
        self
    }

    /// Disable every fixed settle delay (useful against in-memory sessions)
    #[must_use]
    pub fn without_settle_delays(self) -> Self {
        self.settle_delays_ms(0, 0, 0, 0)
    }

    pub fn build(self) -> ResearchResult<ResearchConfig> {
        let config = self.config;

        if config.page_load_timeout_secs == 0 {
            return Err(ResearchError::Config(
                "page_load_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if config.script_timeout_secs == 0 {
            return Err(ResearchError::Config(
                "script_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if config.llm_timeout_secs == 0 {
            return Err(ResearchError::Config(
                "llm_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let engine = Url::parse(&config.search_engine_url).map_err(|e| {
            ResearchError::Config(format!(
                "Invalid search engine URL '{}': {e}",
                config.search_engine_url
            ))
        })?;
        if engine.host_str().is_none() {
            return Err(ResearchError::Config(format!(
                "Search engine URL '{}' has no host",
                config.search_engine_url
            )));
        }

        Url::parse(&config.ollama_url).map_err(|e| {
            ResearchError::Config(format!("Invalid Ollama URL '{}': {e}", config.ollama_url))
        })?;

        if config.ollama_model.trim().is_empty() {
            return Err(ResearchError::Config("ollama_model cannot be empty".to_string()));
        }

        Ok(config)
    }
}
