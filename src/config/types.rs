//! Core configuration type for research runs
//!
//! `ResearchConfig` is read-only once built. Every component borrows it; none
//! of them mutate it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_ACCEPTANCE_THRESHOLD, DEFAULT_BLOCKED_SITES,
    DEFAULT_CANDIDATE_SLACK, DEFAULT_LLM_TIMEOUT_SECS, DEFAULT_NAVIGATION_SETTLE_CAP_MS,
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_REASONING_MODEL, DEFAULT_SCRIPT_TIMEOUT_SECS, DEFAULT_SEARCH_ENGINE_URL,
    DEFAULT_SEARCH_SETTLE_CAP_MS, DEFAULT_TAB_SETTLE_MS, DEFAULT_VISIT_SETTLE_MS,
};

/// Main configuration struct for research runs
///
/// Missing fields in a JSON config file fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResearchConfig {
    /// Ollama API endpoint
    pub(crate) ollama_url: String,
    /// Model for summaries and basic prompts
    pub(crate) ollama_model: String,
    /// Model for prompts that ask for deeper reasoning
    pub(crate) reasoning_model: String,
    /// Per-request timeout for the LLM backend
    pub(crate) llm_timeout_secs: u64,

    pub(crate) headless: bool,
    pub(crate) user_agent: String,

    /// Timeout for page navigation
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,

    /// Timeout for individual script evaluations and DOM queries
    ///
    /// Default: 30 seconds
    pub(crate) script_timeout_secs: u64,

    /// Root directory for run folders, reports and screenshots
    pub(crate) output_dir: PathBuf,

    /// URL fragments of sites known to reject automated extraction
    pub(crate) blocked_sites: Vec<String>,

    /// Base URL of the search engine
    pub(crate) search_engine_url: String,

    /// Character count extracted text must exceed to be usable
    pub(crate) acceptance_threshold: usize,

    /// Extra candidates considered beyond the requested article count
    pub(crate) candidate_slack: usize,

    pub(crate) navigation_settle_cap_ms: u64,
    pub(crate) search_settle_cap_ms: u64,
    pub(crate) visit_settle_ms: u64,
    pub(crate) tab_settle_ms: u64,

    /// Capture a screenshot of each visited article
    pub(crate) capture_screenshots: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            headless: false,
            user_agent: CHROME_USER_AGENT.to_string(),
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            script_timeout_secs: DEFAULT_SCRIPT_TIMEOUT_SECS,
            output_dir: PathBuf::from("output"),
            blocked_sites: DEFAULT_BLOCKED_SITES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            search_engine_url: DEFAULT_SEARCH_ENGINE_URL.to_string(),
            acceptance_threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            candidate_slack: DEFAULT_CANDIDATE_SLACK,
            navigation_settle_cap_ms: DEFAULT_NAVIGATION_SETTLE_CAP_MS,
            search_settle_cap_ms: DEFAULT_SEARCH_SETTLE_CAP_MS,
            visit_settle_ms: DEFAULT_VISIT_SETTLE_MS,
            tab_settle_ms: DEFAULT_TAB_SETTLE_MS,
            capture_screenshots: true,
        }
    }
}
