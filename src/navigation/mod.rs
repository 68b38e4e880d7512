//! Navigation and tab control
//!
//! Every operation is best-effort: it checks that the session is alive,
//! converts driver errors and timeouts into `false`, and logs the outcome.

mod search_url;
pub mod wait;

pub use search_url::{SearchKind, build_search_url};

use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::ResearchConfig;
use crate::deadline::bounded_settle;
use crate::session::BrowseSession;
use wait::{settle, wait_for_any_selector, with_timeout};

/// Containers that only exist once the engine has rendered its results
pub const RESULTS_CONTAINER_SELECTORS: &[&str] =
    &[".react-results--main", ".result__body", ".results"];

const BODY_WAIT_CAP: Duration = Duration::from_secs(10);
const RESULTS_WAIT_CAP: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct Navigator {
    search_engine_url: String,
    navigation_settle_cap: Duration,
    search_settle_cap: Duration,
    tab_settle: Duration,
}

impl Navigator {
    #[must_use]
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self {
            search_engine_url: config.search_engine_url().to_string(),
            navigation_settle_cap: config.navigation_settle_cap(),
            search_settle_cap: config.search_settle_cap(),
            tab_settle: config.tab_settle(),
        }
    }

    /// Load `url` in the current tab and wait for `body`.
    ///
    /// Settles for `min(navigation_settle_cap, timeout / 3)` after the body
    /// appears. Returns `false` on timeout or driver error.
    pub async fn navigate<S>(&self, session: &S, url: &str, timeout: Duration) -> bool
    where
        S: BrowseSession + ?Sized,
    {
        if !session.is_alive().await {
            error!("Browser not initialized");
            return false;
        }

        info!("Navigating to {url}");
        let start = Instant::now();

        if let Err(e) = with_timeout(session.goto(url), timeout, "Navigation").await {
            warn!(
                "Navigation to {url} failed after {:.2}s: {e:#}",
                start.elapsed().as_secs_f64()
            );
            return false;
        }

        if wait_for_any_selector(session, &["body"], BODY_WAIT_CAP.min(timeout))
            .await
            .is_none()
        {
            warn!(
                "Timeout after {:.2}s while navigating to {url}",
                start.elapsed().as_secs_f64()
            );
            return false;
        }

        settle(bounded_settle(timeout, 3, self.navigation_settle_cap)).await;

        info!(
            "Successfully navigated to {url} in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        true
    }

    /// Run a search and wait for the engine's results container.
    pub async fn search<S>(&self, session: &S, query: &str, kind: SearchKind, timeout: Duration) -> bool
    where
        S: BrowseSession + ?Sized,
    {
        info!("Searching for: {query} (type: {kind})");

        let url = match build_search_url(&self.search_engine_url, query, kind) {
            Ok(url) => url,
            Err(e) => {
                error!("Cannot build search URL: {e:#}");
                return false;
            }
        };

        if !self.navigate(session, url.as_str(), timeout).await {
            error!("Failed to navigate to search page for query: {query}");
            return false;
        }

        let Some(container) =
            wait_for_any_selector(session, RESULTS_CONTAINER_SELECTORS, RESULTS_WAIT_CAP.min(timeout / 2))
                .await
        else {
            warn!("Timeout waiting for search results for query: {query}");
            return false;
        };
        debug!("Results container '{container}' present");

        settle(bounded_settle(timeout, 10, self.search_settle_cap)).await;

        info!("Search results loaded for query: {query}");
        true
    }

    /// Open `url` in a new tab and make it current.
    ///
    /// On failure the previous tab stays current.
    pub async fn open_ephemeral_tab<S>(&self, session: &S, url: &str) -> bool
    where
        S: BrowseSession + ?Sized,
    {
        if !session.is_alive().await {
            error!("Browser not initialized");
            return false;
        }

        match session.open_tab(url).await {
            Ok(()) => {
                settle(self.tab_settle).await;
                debug!("Opened tab for {url}");
                true
            }
            Err(e) => {
                error!("Error opening new tab: {e:#}");
                false
            }
        }
    }

    /// Close the current tab and return to the first one.
    ///
    /// Refuses when only one tab is open.
    pub async fn close_ephemeral_tab<S>(&self, session: &S) -> bool
    where
        S: BrowseSession + ?Sized,
    {
        if !session.is_alive().await {
            error!("Browser not initialized");
            return false;
        }

        match session.tab_count().await {
            Ok(count) if count > 1 => {}
            Ok(_) => {
                warn!("Only one tab open, cannot close");
                return false;
            }
            Err(e) => {
                error!("Error counting tabs: {e:#}");
                return false;
            }
        }

        match session.close_current_tab().await {
            Ok(()) => {
                settle(self.tab_settle).await;
                true
            }
            Err(e) => {
                error!("Error closing tab: {e:#}");
                false
            }
        }
    }
}
