//! Browser session capability
//!
//! `BrowseSession` is the one shared mutable resource of a research run. The
//! orchestrator owns it and lends `&S` to the navigator, harvester and
//! extractor in turn; nothing holds it concurrently.
//!
//! Methods are thin driver calls and may fail. The components built on top
//! (`navigation`, `harvester`, `extractor`) convert failures into `false`,
//! empty lists or rejected candidates.

mod chromium;

pub use chromium::{ChromiumSession, LaunchProfile};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Rendered state of one DOM element at query time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Visible text (`innerText`), untrimmed
    #[serde(default)]
    pub text: String,
    /// Raw `href` attribute as written in the markup
    #[serde(default)]
    pub href: Option<String>,
    /// `href` resolved against the document URL
    #[serde(default)]
    pub url: Option<String>,
}

impl ElementSnapshot {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait BrowseSession: Send + Sync {
    /// Cheap liveness probe; a crashed or quit browser reports `false`
    async fn is_alive(&self) -> bool;

    /// Load `url` in the current tab
    async fn goto(&self, url: &str) -> Result<()>;

    /// Snapshot every element matching a CSS selector in the current tab
    async fn query(&self, selector: &str) -> Result<Vec<ElementSnapshot>>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Open `url` in a new tab and make it current
    async fn open_tab(&self, url: &str) -> Result<()>;

    /// Close the current tab and return to the first tab
    async fn close_current_tab(&self) -> Result<()>;

    async fn tab_count(&self) -> Result<usize>;

    /// PNG screenshot of the current tab
    async fn screenshot(&self) -> Result<Vec<u8>>;
}
