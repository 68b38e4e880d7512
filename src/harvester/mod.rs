//! Link harvesting from a rendered search results page
//!
//! Discovery runs as an ordered chain of strategies. Each stage feeds the same
//! deduplicating collector and the chain stops as soon as a stage's
//! early-stop predicate is satisfied.

mod filter;

pub use filter::LinkFilter;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::deadline::Deadline;
use crate::session::{BrowseSession, ElementSnapshot};
use crate::utils::{resolve_href, safe_truncate_chars};

/// Engine result-title selectors, most specific first
pub const RESULT_LINK_SELECTORS: &[&str] = &[
    ".result__title a",
    ".result__a",
    ".result--web a",
    "article a",
    ".c-base a",
    ".web-result a",
    ".react-results--main .tilegroup__link",
    ".react-results--main a[href]",
];

const BULK_MIN_TEXT_CHARS: usize = 5;
const LAST_RESORT_MIN_TEXT_CHARS: usize = 10;
const LAST_RESORT_CAP: usize = 10;
const UNTITLED: &str = "Untitled";

/// A candidate article link, in discovery order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub anchor_text: String,
    /// 1-based discovery order
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Every `a[href]` on the page in one pass
    BulkAnchors,
    /// Engine-specific result selectors
    SelectorScan,
    /// All `a` elements with a stricter text filter
    LastResort,
}

impl DiscoveryStrategy {
    pub const CHAIN: [Self; 3] = [Self::BulkAnchors, Self::SelectorScan, Self::LastResort];

    /// Whether this stage runs given how many links earlier stages found
    fn should_run(self, found: usize, deadline: &Deadline) -> bool {
        match self {
            Self::BulkAnchors => true,
            Self::SelectorScan => !deadline.is_expired(),
            Self::LastResort => found < 3 && !deadline.is_expired(),
        }
    }

    /// Early-stop predicate checked after this stage
    fn is_satisfied(self, found: usize) -> bool {
        match self {
            Self::BulkAnchors => found >= 3,
            Self::SelectorScan => found >= 5,
            Self::LastResort => true,
        }
    }
}

/// Ordered, URL-unique accumulator
#[derive(Debug, Default)]
struct Collector {
    seen: HashSet<String>,
    candidates: Vec<Candidate>,
}

impl Collector {
    fn len(&self) -> usize {
        self.candidates.len()
    }

    fn push(&mut self, url: String, anchor_text: String) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        let rank = self.candidates.len() + 1;
        self.candidates.push(Candidate {
            url,
            anchor_text,
            rank,
        });
        true
    }
}

/// Absolute URL of an anchor snapshot, preferring the browser's resolution
fn resolved_url(snapshot: &ElementSnapshot, page_url: &str) -> Option<(String, String)> {
    let raw = snapshot.href.as_deref()?.trim().to_string();
    let resolved = snapshot
        .url
        .clone()
        .filter(|u| !u.is_empty())
        .or_else(|| resolve_href(page_url, &raw))?;
    Some((raw, resolved))
}

/// Harvest candidate article links from the current page.
///
/// Never errors: a dead session or a page with nothing usable yields an
/// empty list. Output is unique by exact URL and ordered by discovery.
pub async fn find_links<S>(session: &S, filter: &LinkFilter, timeout: Duration) -> Vec<Candidate>
where
    S: BrowseSession + ?Sized,
{
    if !session.is_alive().await {
        warn!("Browser not initialized");
        return Vec::new();
    }

    let deadline = Deadline::after(timeout);
    let page_url = session.current_url().await.unwrap_or_default();
    let mut collector = Collector::default();

    info!("Searching for external result links");

    for strategy in DiscoveryStrategy::CHAIN {
        if !strategy.should_run(collector.len(), &deadline) {
            if deadline.is_expired() {
                warn!("Link finding timeout reached");
            }
            break;
        }

        let before = collector.len();
        match strategy {
            DiscoveryStrategy::BulkAnchors => {
                bulk_anchors(session, filter, &page_url, &mut collector).await;
            }
            DiscoveryStrategy::SelectorScan => {
                selector_scan(session, filter, &page_url, &deadline, &mut collector).await;
            }
            DiscoveryStrategy::LastResort => {
                last_resort(session, filter, &page_url, &mut collector).await;
            }
        }
        debug!(
            "{strategy:?} added {} links ({} total)",
            collector.len() - before,
            collector.len()
        );

        if strategy.is_satisfied(collector.len()) {
            break;
        }
    }

    info!("Total extracted: {} valid external URLs", collector.len());
    for candidate in collector.candidates.iter().take(3) {
        info!(
            "Sample URL {}: {} -> {}",
            candidate.rank,
            safe_truncate_chars(&candidate.anchor_text, 30),
            candidate.url
        );
    }

    collector.candidates
}

async fn bulk_anchors<S>(session: &S, filter: &LinkFilter, page_url: &str, collector: &mut Collector)
where
    S: BrowseSession + ?Sized,
{
    let anchors = match session.query("a[href]").await {
        Ok(anchors) => anchors,
        Err(e) => {
            warn!("Bulk anchor extraction failed: {e:#}");
            return;
        }
    };

    for anchor in &anchors {
        let text = anchor.text.trim();
        if text.chars().count() < BULK_MIN_TEXT_CHARS {
            continue;
        }
        if let Some((raw, url)) = resolved_url(anchor, page_url)
            && filter.accepts(&raw, &url)
        {
            collector.push(url, text.to_string());
        }
    }

    info!("Found {} external URLs in bulk anchor pass", collector.len());
}

async fn selector_scan<S>(
    session: &S,
    filter: &LinkFilter,
    page_url: &str,
    deadline: &Deadline,
    collector: &mut Collector,
) where
    S: BrowseSession + ?Sized,
{
    for selector in RESULT_LINK_SELECTORS {
        if deadline.is_expired() {
            warn!("Link finding timeout reached");
            break;
        }

        let links = match session.query(selector).await {
            Ok(links) => links,
            Err(e) => {
                debug!("Error finding links with selector {selector}: {e:#}");
                continue;
            }
        };
        if links.is_empty() {
            continue;
        }

        for link in &links {
            let Some((raw, url)) = resolved_url(link, page_url) else {
                continue;
            };
            if !filter.accepts(&raw, &url) {
                continue;
            }
            let text = link.text.trim();
            let text = if text.is_empty() { UNTITLED } else { text };
            collector.push(url, text.to_string());
        }

        info!(
            "Found {} total links after checking selector '{selector}'",
            collector.len()
        );

        if DiscoveryStrategy::SelectorScan.is_satisfied(collector.len()) {
            break;
        }
    }
}

async fn last_resort<S>(session: &S, filter: &LinkFilter, page_url: &str, collector: &mut Collector)
where
    S: BrowseSession + ?Sized,
{
    info!("Using fallback method to get all <a> tags");

    let anchors = match session.query("a").await {
        Ok(anchors) => anchors,
        Err(e) => {
            warn!("Error in fallback link finding: {e:#}");
            return;
        }
    };

    for anchor in &anchors {
        if collector.len() >= LAST_RESORT_CAP {
            break;
        }
        let text = anchor.text.trim();
        if text.chars().count() < LAST_RESORT_MIN_TEXT_CHARS {
            continue;
        }
        if let Some((raw, url)) = resolved_url(anchor, page_url)
            && filter.accepts(&raw, &url)
        {
            collector.push(url, text.to_string());
        }
    }

    info!("Final fallback found {} external URLs", collector.len());
}
