//! Browse-and-analyze loop
//!
//! Search, harvest candidate links, then visit candidates one at a time in an
//! ephemeral tab until enough articles pass the acceptance threshold or the
//! run's deadline expires. Whatever happens while a candidate is open, the
//! loop returns to the primary tab before moving on.

mod types;

pub use types::{ArticleRecord, BrowsePhase, SearchRequest};

use anyhow::{Result, anyhow};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ResearchConfig;
use crate::deadline::Deadline;
use crate::extractor::extract;
use crate::harvester::{Candidate, LinkFilter, find_links};
use crate::navigation::Navigator;
use crate::navigation::wait::{settle, wait_for_any_selector, with_timeout};
use crate::output::{RunDirectory, save_screenshot, save_text};
use crate::session::BrowseSession;
use crate::utils::safe_truncate_chars;

const HARVEST_TIMEOUT_CAP: Duration = Duration::from_secs(15);
const ARTICLE_BODY_WAIT_CAP: Duration = Duration::from_secs(15);
pub const SEARCH_SCREENSHOT_FILE: &str = "search_results.png";

/// One browse run over a borrowed session
pub struct BrowseRun<'a, S: BrowseSession + ?Sized> {
    session: &'a S,
    config: &'a ResearchConfig,
    navigator: Navigator,
    filter: LinkFilter,
    save_dir: Option<&'a RunDirectory>,
    phase: BrowsePhase,
}

impl<'a, S: BrowseSession + ?Sized> BrowseRun<'a, S> {
    #[must_use]
    pub fn new(session: &'a S, config: &'a ResearchConfig) -> Self {
        Self {
            session,
            config,
            navigator: Navigator::from_config(config),
            filter: LinkFilter::from_config(config),
            save_dir: None,
            phase: BrowsePhase::Idle,
        }
    }

    /// Save the results screenshot and per-candidate text/screenshots here
    #[must_use]
    pub fn save_to(mut self, dir: &'a RunDirectory) -> Self {
        self.save_dir = Some(dir);
        self
    }

    #[must_use]
    pub fn phase(&self) -> BrowsePhase {
        self.phase
    }

    fn enter(&mut self, phase: BrowsePhase) {
        debug!("Browse phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Run the loop and return accepted articles in discovery order.
    pub async fn run(&mut self, request: &SearchRequest, target_count: usize) -> Vec<ArticleRecord> {
        let deadline = Deadline::after(request.time_budget);
        let query = request.query.as_str();
        info!("Starting to browse and analyze results for query: {query}");

        self.enter(BrowsePhase::Searching);
        if !self
            .navigator
            .search(self.session, query, request.kind, deadline.remaining())
            .await
        {
            error!("Failed to search for {query}");
            self.enter(BrowsePhase::Done);
            return Vec::new();
        }

        if let Some(dir) = self.save_dir
            && self.config.capture_screenshots()
        {
            match self.session.screenshot().await {
                Ok(png) => {
                    save_screenshot(&png, &dir.join(SEARCH_SCREENSHOT_FILE)).await;
                }
                Err(e) => warn!("Search results screenshot failed: {e:#}"),
            }
        }

        self.enter(BrowsePhase::Harvesting);
        let candidates = find_links(
            self.session,
            &self.filter,
            HARVEST_TIMEOUT_CAP.min(deadline.remaining()),
        )
        .await;
        if candidates.is_empty() {
            warn!("No suitable links found for query: {query}");
            self.enter(BrowsePhase::Done);
            return Vec::new();
        }
        info!("Found {} links for query: {query}", candidates.len());

        let baseline_tabs = self.session.tab_count().await.unwrap_or(1);
        let max_visits = target_count + self.config.candidate_slack();
        let mut accepted = Vec::new();

        for (index, candidate) in candidates.iter().take(max_visits).enumerate() {
            if accepted.len() >= target_count {
                break;
            }
            if deadline.is_expired() {
                warn!(
                    "Browse deadline reached after {:.1}s; stopping with {} articles",
                    deadline.elapsed().as_secs_f64(),
                    accepted.len()
                );
                break;
            }

            if let Some(record) = self.visit_candidate(index, candidate, &deadline).await {
                info!(
                    "Successfully extracted {} characters from article: {}",
                    record.content.chars().count(),
                    safe_truncate_chars(&record.title, 40)
                );
                accepted.push(record);
            }

            self.restore_primary_tab(baseline_tabs).await;
        }

        info!(
            "Completed browsing and analyzing {} articles for query: {query}",
            accepted.len()
        );
        self.enter(BrowsePhase::Done);
        accepted
    }

    async fn visit_candidate(
        &mut self,
        index: usize,
        candidate: &Candidate,
        deadline: &Deadline,
    ) -> Option<ArticleRecord> {
        self.enter(BrowsePhase::Visiting(index));
        info!(
            "Visiting article {}: {} at {}",
            index + 1,
            safe_truncate_chars(&candidate.anchor_text, 50),
            candidate.url
        );

        if !self
            .navigator
            .open_ephemeral_tab(self.session, &candidate.url)
            .await
        {
            warn!("Failed to open article in new tab: {}", candidate.url);
            return None;
        }

        self.enter(BrowsePhase::Extracting(index));
        let visit = with_timeout(
            self.process_open_tab(index, candidate, deadline),
            deadline.remaining(),
            "Article visit",
        );
        let outcome = AssertUnwindSafe(visit).catch_unwind().await;

        let record = match outcome {
            Ok(Ok(record)) => record,
            Ok(Err(e)) => {
                error!("Error processing article {}: {e:#}", candidate.url);
                None
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Panic while processing article {}: {message}", candidate.url);
                None
            }
        };

        if !self.navigator.close_ephemeral_tab(self.session).await {
            warn!("Failed to close tab for {}", candidate.url);
        }
        record
    }

    async fn process_open_tab(
        &self,
        index: usize,
        candidate: &Candidate,
        deadline: &Deadline,
    ) -> Result<Option<ArticleRecord>> {
        let body_wait = deadline.share(3, ARTICLE_BODY_WAIT_CAP);
        if wait_for_any_selector(self.session, &["body"], body_wait)
            .await
            .is_none()
        {
            return Err(anyhow!(
                "Timeout waiting for article to load after {:.1}s",
                body_wait.as_secs_f64()
            ));
        }
        settle(self.config.visit_settle()).await;

        let screenshot = if self.config.capture_screenshots() {
            match self.session.screenshot().await {
                Ok(png) => Some(png),
                Err(e) => {
                    warn!("Article screenshot failed: {e:#}");
                    None
                }
            }
        } else {
            None
        };

        if let (Some(dir), Some(png)) = (self.save_dir, screenshot.as_deref()) {
            save_screenshot(png, &dir.article_screenshot_path(index, &candidate.anchor_text)).await;
        }

        let threshold = self.config.acceptance_threshold();
        let result = extract(self.session, threshold).await;

        if let Some(dir) = self.save_dir
            && !result.text.is_empty()
        {
            save_text(&result.text, &dir.article_text_path(index, &candidate.anchor_text)).await;
        }

        if !result.exceeds(threshold) {
            warn!(
                "No substantial content extracted from: {} ({} chars)",
                candidate.url,
                result.char_count()
            );
            return Ok(None);
        }

        Ok(Some(ArticleRecord {
            title: candidate.anchor_text.clone(),
            url: candidate.url.clone(),
            content: result.text,
            strategy: result.strategy_used,
            metadata: result.metadata,
            screenshot,
        }))
    }

    /// Close stray tabs until only the tabs present before the loop remain
    async fn restore_primary_tab(&self, baseline: usize) {
        for _ in 0..3 {
            match self.session.tab_count().await {
                Ok(count) if count > baseline => {
                    warn!("{} extra tab(s) open after candidate; closing", count - baseline);
                    if !self.navigator.close_ephemeral_tab(self.session).await {
                        break;
                    }
                }
                _ => return,
            }
        }
    }
}

/// Search for `request.query`, visit candidates and return up to
/// `target_count` accepted articles.
///
/// Never errors: a failed search or an empty harvest yields an empty list.
pub async fn browse_and_analyze<S>(
    session: &S,
    config: &ResearchConfig,
    request: &SearchRequest,
    target_count: usize,
    save_dir: Option<&RunDirectory>,
) -> Vec<ArticleRecord>
where
    S: BrowseSession + ?Sized,
{
    let mut run = BrowseRun::new(session, config);
    if let Some(dir) = save_dir {
        run = run.save_to(dir);
    }
    run.run(request, target_count).await
}
