//! Error types for research runs
//!
//! Only session-fatal and setup failures surface as errors. Everything that
//! goes wrong while browsing a single page is downgraded to `false`, an empty
//! list or a rejected candidate at the component boundary.

use thiserror::Error;

/// Convenience alias for Result with `ResearchError`
pub type ResearchResult<T> = Result<T, ResearchError>;

#[derive(Debug, Error)]
pub enum ResearchError {
    /// Browser could not be started, even with the fallback launch profile
    #[error("Failed to initialize browser session: {0}")]
    SessionInit(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ResearchError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::Other(format!("{err:#}"))
    }
}
