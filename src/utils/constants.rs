//! Shared configuration constants for deep_researcher
//!
//! Default values used by the config builder and the browsing pipeline.
//! Everything tunable here is also exposed on `ResearchConfig`.

/// Minimum number of characters extracted text must exceed to count as an article
///
/// Used both to decide whether the extractor tries its next strategy and to
/// decide whether the orchestrator accepts a visited page.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: usize = 200;

/// Extra candidates visited beyond the requested article count
///
/// With a target of 3 articles the orchestrator considers at most 6 candidates.
pub const DEFAULT_CANDIDATE_SLACK: usize = 3;

/// Page load timeout in seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Script evaluation timeout in seconds
pub const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the settle delay after a successful navigation
pub const DEFAULT_NAVIGATION_SETTLE_CAP_MS: u64 = 5_000;

/// Upper bound on the settle delay after search results appear
pub const DEFAULT_SEARCH_SETTLE_CAP_MS: u64 = 3_000;

/// Fixed settle delay after a visited article reports `body`
pub const DEFAULT_VISIT_SETTLE_MS: u64 = 2_000;

/// Delay after opening or closing a tab
pub const DEFAULT_TAB_SETTLE_MS: u64 = 1_000;

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Model used for summaries and other basic prompts
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// Model used when a prompt asks for deeper reasoning
pub const DEFAULT_REASONING_MODEL: &str = "deepseek-r1";

/// Per-request timeout for the LLM backend in seconds
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Search engine base URL
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://duckduckgo.com/";

/// Sites that reliably reject automated extraction
pub const DEFAULT_BLOCKED_SITES: &[&str] = &[
    "msn.com",
    "facebook.com",
    "sfgate.com",
    "nytimes.com",
    "medium.com",
    "wsj.com",
    "bloomberg.com",
];

/// Chrome user agent string for stealth mode
///
/// Keep within a few releases of current stable Chrome.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

/// Browser window size used for every launch profile
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);
