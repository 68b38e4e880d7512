//! Test utilities for the deep_researcher test suite
//!
//! `FakeSession` is an in-memory `BrowseSession` over static HTML. Element
//! queries run through `scraper`, tabs are a stack of URLs, and individual
//! URLs can be rigged to fail or panic.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use deep_researcher::{BrowseSession, ElementSnapshot, ResearchConfig};
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;

const EMPTY_PAGE: &str = "<html><head></head><body></body></html>";
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Host every search URL is served from
#[allow(dead_code)]
pub const ENGINE_PREFIX: &str = "https://duckduckgo.com/";

#[derive(Debug, Default)]
struct Tabs {
    urls: Vec<String>,
    max_open: usize,
}

#[derive(Debug, Default)]
pub struct FakeSession {
    pages: HashMap<String, String>,
    search_page: Option<String>,
    failing_opens: HashSet<String>,
    failing_queries: HashSet<String>,
    failing_selectors: HashSet<String>,
    panicking: HashSet<String>,
    query_delays: HashMap<String, Duration>,
    dead: AtomicBool,
    tabs: Mutex<Tabs>,
    visits: Mutex<Vec<String>>,
    screenshots: AtomicUsize,
}

#[allow(dead_code)]
impl FakeSession {
    pub fn new() -> Self {
        let session = Self::default();
        session.tabs_mut().urls.push("about:blank".to_string());
        session.tabs_mut().max_open = 1;
        session
    }

    /// Serve `html` for every URL under the search engine
    pub fn with_search_page(mut self, html: impl Into<String>) -> Self {
        self.search_page = Some(html.into());
        self
    }

    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Opening a tab for `url` fails the way a refused navigation does
    pub fn failing_open(mut self, url: &str) -> Self {
        self.failing_opens.insert(url.to_string());
        self
    }

    /// Every element query on `url` errors
    pub fn failing_queries(mut self, url: &str) -> Self {
        self.failing_queries.insert(url.to_string());
        self
    }

    /// Queries for exactly `selector` error on every page
    pub fn failing_selector(mut self, selector: &str) -> Self {
        self.failing_selectors.insert(selector.to_string());
        self
    }

    /// Every element query on `url` panics
    pub fn panicking_on(mut self, url: &str) -> Self {
        self.panicking.insert(url.to_string());
        self
    }

    /// Every element query on `url` takes `delay` before answering
    pub fn slow_queries(mut self, url: &str, delay: Duration) -> Self {
        self.query_delays.insert(url.to_string(), delay);
        self
    }

    pub fn kill(&self) {
        self.dead.store(true, Ordering::SeqCst);
    }

    pub fn open_tabs(&self) -> usize {
        self.tabs_mut().urls.len()
    }

    pub fn max_open_tabs(&self) -> usize {
        self.tabs_mut().max_open
    }

    /// URLs opened in new tabs, in order
    pub fn visited(&self) -> Vec<String> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn screenshots_taken(&self) -> usize {
        self.screenshots.load(Ordering::SeqCst)
    }

    fn tabs_mut(&self) -> std::sync::MutexGuard<'_, Tabs> {
        self.tabs.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn current(&self) -> String {
        self.tabs_mut().urls.last().cloned().unwrap_or_default()
    }

    fn html_for(&self, url: &str) -> String {
        if let Some(html) = self.pages.get(url) {
            return html.clone();
        }
        match &self.search_page {
            Some(html) if url.starts_with(ENGINE_PREFIX) => html.clone(),
            _ => EMPTY_PAGE.to_string(),
        }
    }
}

fn snapshot(element: scraper::ElementRef<'_>, page_url: &str) -> ElementSnapshot {
    let href = element.value().attr("href").map(str::to_string);
    let url = href.as_deref().and_then(|h| {
        Url::parse(page_url)
            .ok()
            .and_then(|base| base.join(h).ok())
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .map(|u| u.to_string())
    });
    ElementSnapshot {
        text: element.text().collect::<String>(),
        href,
        url,
    }
}

#[async_trait]
impl BrowseSession for FakeSession {
    async fn is_alive(&self) -> bool {
        !self.dead.load(Ordering::SeqCst)
    }

    async fn goto(&self, url: &str) -> Result<()> {
        if !self.is_alive().await {
            bail!("session closed");
        }
        let mut tabs = self.tabs_mut();
        if let Some(current) = tabs.urls.last_mut() {
            *current = url.to_string();
        }
        Ok(())
    }

    async fn query(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let url = self.current();
        if let Some(delay) = self.query_delays.get(&url) {
            tokio::time::sleep(*delay).await;
        }
        if self.panicking.contains(&url) {
            panic!("renderer crashed on {url}");
        }
        if self.failing_queries.contains(&url) || self.failing_selectors.contains(selector) {
            bail!("Execution context was destroyed");
        }

        let selector =
            Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector}: {e:?}"))?;
        let document = Html::parse_document(&self.html_for(&url));
        Ok(document
            .select(&selector)
            .map(|el| snapshot(el, &url))
            .collect())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.current())
    }

    async fn title(&self) -> Result<String> {
        let titles = self.query("title").await?;
        Ok(titles.into_iter().next().map(|t| t.text).unwrap_or_default())
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        self.visits
            .lock()
            .map_err(|_| anyhow!("visit log poisoned"))?
            .push(url.to_string());
        if self.failing_opens.contains(url) {
            bail!("net::ERR_CONNECTION_REFUSED");
        }
        let mut tabs = self.tabs_mut();
        tabs.urls.push(url.to_string());
        tabs.max_open = tabs.max_open.max(tabs.urls.len());
        Ok(())
    }

    async fn close_current_tab(&self) -> Result<()> {
        let mut tabs = self.tabs_mut();
        if tabs.urls.len() <= 1 {
            bail!("refusing to close the last tab");
        }
        tabs.urls.pop();
        Ok(())
    }

    async fn tab_count(&self) -> Result<usize> {
        Ok(self.open_tabs())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        self.screenshots.fetch_add(1, Ordering::SeqCst);
        Ok(PNG_MAGIC.to_vec())
    }
}

/// Config with every settle delay disabled, writing into `output_dir`
#[allow(dead_code)]
pub fn test_config(output_dir: &Path) -> ResearchConfig {
    ResearchConfig::builder()
        .without_settle_delays()
        .output_dir(output_dir)
        .build()
        .expect("test config is valid")
}

#[allow(dead_code)]
pub fn create_test_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Minimal HTML document with a title and body
#[allow(dead_code)]
pub fn create_test_html(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Article page whose `<article>` holds `paragraphs` sentences of real prose
#[allow(dead_code)]
pub fn article_html(title: &str, paragraphs: usize) -> String {
    let body: String = (0..paragraphs)
        .map(|i| {
            format!(
                "<p>Paragraph {i} of {title} explains the finding in enough detail to count as article text.</p>"
            )
        })
        .collect();
    create_test_html(
        title,
        &format!(
            "<nav>Home | World | Tech | Sports</nav><article><h1>{title}</h1>{body}</article><footer>Copyright notice</footer>"
        ),
    )
}

/// Search results page with one `.result__a` anchor per `(url, text)` pair
#[allow(dead_code)]
pub fn search_results_html(links: &[(&str, &str)]) -> String {
    let results: String = links
        .iter()
        .map(|(url, text)| {
            format!(
                r#"<div class="result__body"><h2 class="result__title"><a class="result__a" href="{url}">{text}</a></h2></div>"#
            )
        })
        .collect();
    create_test_html(
        "DuckDuckGo",
        &format!(
            r##"<a href="#">Back to top</a>
<a href="/?q=more&t=h_">More results from DuckDuckGo</a>
<a href="javascript:void(0)">Open settings panel</a>
<div class="results">{results}</div>"##
        ),
    )
}
