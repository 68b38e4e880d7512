//! Article text extraction from a loaded page
//!
//! Extraction is a fallback chain. Each stage only runs when the cleaned text
//! of the previous stage does not exceed the acceptance threshold, and the
//! final stage's output is used whatever its length.

mod clean;

pub use clean::clean;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::session::BrowseSession;

/// Page chrome stripped from the body text in the first stage
pub const NOISE_SELECTOR: &str =
    "nav, header, footer, .nav, .menu, .cookie, .ad, .advertisement, #comments, .comments";

/// Common article containers, most specific first
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".article-content",
    ".article-body",
    ".content",
    "main",
    ".post-content",
];

const MIN_PARAGRAPH_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStrategy {
    /// Body text minus navigation, headers, footers, ads and comments
    DocumentText,
    /// First content container whose text clears the threshold
    SelectorScan,
    /// Every substantial `<p>` joined by blank lines
    Paragraphs,
    /// Unfiltered body text
    RawBody,
}

impl ExtractionStrategy {
    pub const CHAIN: [Self; 4] = [
        Self::DocumentText,
        Self::SelectorScan,
        Self::Paragraphs,
        Self::RawBody,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub source_url: String,
    pub page_title: String,
    pub timestamp: DateTime<Utc>,
    pub extraction_duration: Duration,
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Cleaned text, possibly empty
    pub text: String,
    pub strategy_used: ExtractionStrategy,
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.metadata.char_count
    }

    /// Acceptance policy: strictly more than `threshold` characters
    #[must_use]
    pub fn exceeds(&self, threshold: usize) -> bool {
        self.char_count() > threshold
    }
}

fn exceeds_threshold(text: &str, threshold: usize) -> bool {
    text.chars().count() > threshold
}

/// Extract the best-effort article text of the current page.
///
/// Never errors. Query failures inside a stage make that stage yield empty
/// text and the chain moves on.
pub async fn extract<S>(session: &S, threshold: usize) -> ExtractionResult
where
    S: BrowseSession + ?Sized,
{
    let start = Instant::now();
    let timestamp = Utc::now();

    if !session.is_alive().await {
        warn!("Browser not initialized");
        return ExtractionResult {
            text: String::new(),
            strategy_used: ExtractionStrategy::RawBody,
            metadata: ExtractionMetadata {
                source_url: String::new(),
                page_title: String::new(),
                timestamp,
                extraction_duration: start.elapsed(),
                char_count: 0,
            },
        };
    }

    let source_url = session.current_url().await.unwrap_or_default();
    let page_title = session.title().await.unwrap_or_default();

    let mut text = String::new();
    let mut strategy_used = ExtractionStrategy::RawBody;

    for strategy in ExtractionStrategy::CHAIN {
        text = clean(&run_strategy(session, strategy, threshold).await);
        strategy_used = strategy;
        if exceeds_threshold(&text, threshold) {
            break;
        }
        debug!(
            "{strategy:?} yielded {} chars, trying next strategy",
            text.chars().count()
        );
    }

    let extraction_duration = start.elapsed();
    let char_count = text.chars().count();
    info!(
        "Extracted {char_count} characters in {:.2}s via {strategy_used:?}",
        extraction_duration.as_secs_f64()
    );

    ExtractionResult {
        text,
        strategy_used,
        metadata: ExtractionMetadata {
            source_url,
            page_title,
            timestamp,
            extraction_duration,
            char_count,
        },
    }
}

async fn run_strategy<S>(session: &S, strategy: ExtractionStrategy, threshold: usize) -> String
where
    S: BrowseSession + ?Sized,
{
    match strategy {
        ExtractionStrategy::DocumentText => document_text(session).await,
        ExtractionStrategy::SelectorScan => selector_scan(session, threshold).await,
        ExtractionStrategy::Paragraphs => paragraphs(session).await,
        ExtractionStrategy::RawBody => body_text(session).await,
    }
}

async fn body_text<S>(session: &S) -> String
where
    S: BrowseSession + ?Sized,
{
    match session.query("body").await {
        Ok(bodies) => bodies.into_iter().next().map(|b| b.text).unwrap_or_default(),
        Err(e) => {
            warn!("Error getting body text: {e:#}");
            String::new()
        }
    }
}

async fn document_text<S>(session: &S) -> String
where
    S: BrowseSession + ?Sized,
{
    let mut text = body_text(session).await;
    if text.is_empty() {
        return text;
    }

    match session.query(NOISE_SELECTOR).await {
        Ok(noise) => {
            for region in noise.iter().filter(|n| !n.text.is_empty()) {
                text = text.replacen(&region.text, "", 1);
            }
        }
        Err(e) => debug!("Noise region lookup failed: {e:#}"),
    }
    text
}

async fn selector_scan<S>(session: &S, threshold: usize) -> String
where
    S: BrowseSession + ?Sized,
{
    let mut harvest = String::new();

    for selector in CONTENT_SELECTORS {
        let matches = match session.query(selector).await {
            Ok(matches) if !matches.is_empty() => matches,
            Ok(_) => continue,
            Err(e) => {
                debug!("Content selector {selector} failed: {e:#}");
                continue;
            }
        };

        let joined = matches
            .iter()
            .map(|m| m.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if joined.is_empty() {
            continue;
        }

        info!("Content extracted using selector: {selector}");
        let over = exceeds_threshold(&clean(&joined), threshold);
        harvest = joined;
        if over {
            break;
        }
    }

    harvest
}

async fn paragraphs<S>(session: &S) -> String
where
    S: BrowseSession + ?Sized,
{
    match session.query("p").await {
        Ok(paragraphs) => {
            let kept: Vec<&str> = paragraphs
                .iter()
                .map(|p| p.text.as_str())
                .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
                .collect();
            info!("Content extracted from {} paragraphs", kept.len());
            kept.join("\n\n")
        }
        Err(e) => {
            warn!("Error extracting from paragraphs: {e:#}");
            String::new()
        }
    }
}
