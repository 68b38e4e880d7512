//! Getter methods for `ResearchConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::ResearchConfig;
use crate::utils::registrable_host;

impl ResearchConfig {
    #[must_use]
    pub fn ollama_url(&self) -> &str {
        &self.ollama_url
    }

    #[must_use]
    pub fn ollama_model(&self) -> &str {
        &self.ollama_model
    }

    #[must_use]
    pub fn reasoning_model(&self) -> &str {
        &self.reasoning_model
    }

    #[must_use]
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    #[must_use]
    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }

    #[must_use]
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    #[must_use]
    pub fn blocked_sites(&self) -> &[String] {
        &self.blocked_sites
    }

    #[must_use]
    pub fn search_engine_url(&self) -> &str {
        &self.search_engine_url
    }

    /// Host of the search engine, used to drop the engine's own links
    #[must_use]
    pub fn search_engine_host(&self) -> String {
        registrable_host(&self.search_engine_url).unwrap_or_default()
    }

    #[must_use]
    pub fn acceptance_threshold(&self) -> usize {
        self.acceptance_threshold
    }

    #[must_use]
    pub fn candidate_slack(&self) -> usize {
        self.candidate_slack
    }

    #[must_use]
    pub fn navigation_settle_cap(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_cap_ms)
    }

    #[must_use]
    pub fn search_settle_cap(&self) -> Duration {
        Duration::from_millis(self.search_settle_cap_ms)
    }

    #[must_use]
    pub fn visit_settle(&self) -> Duration {
        Duration::from_millis(self.visit_settle_ms)
    }

    #[must_use]
    pub fn tab_settle(&self) -> Duration {
        Duration::from_millis(self.tab_settle_ms)
    }

    #[must_use]
    pub fn capture_screenshots(&self) -> bool {
        self.capture_screenshots
    }
}
