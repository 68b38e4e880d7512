//! chromiumoxide-backed browse session
//!
//! Owns the browser, its CDP handler task and the ordered list of open tabs.
//! Tab 0 is the primary tab the search runs in; ephemeral tabs are pushed on
//! top and the last entry is always the current tab.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowseSession, ElementSnapshot};
use crate::browser_setup::launch_browser;
use crate::config::ResearchConfig;
use crate::error::{ResearchError, ResearchResult};

/// Hides `navigator.webdriver` before any page script runs
const WEBDRIVER_MASK_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// Browser launch profile, tried in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchProfile {
    Stealth,
    Fallback,
}

impl LaunchProfile {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stealth => "stealth",
            Self::Fallback => "fallback",
        }
    }
}

pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler: JoinHandle<()>,
    pages: Mutex<Vec<Page>>,
    user_data_dir: StdMutex<Option<PathBuf>>,
    user_agent: String,
    page_load_timeout: Duration,
    script_timeout: Duration,
}

impl ChromiumSession {
    /// Launch a browser and open the primary tab.
    ///
    /// The stealth profile is tried first; if it fails the conservative
    /// fallback profile is tried once. Both failing is fatal.
    pub async fn launch(config: &ResearchConfig) -> ResearchResult<Self> {
        let (browser, handler, user_data_dir) =
            match launch_browser(config, LaunchProfile::Stealth).await {
                Ok(launched) => launched,
                Err(stealth_err) => {
                    warn!("Stealth browser launch failed: {stealth_err:#}. Trying fallback profile");
                    launch_browser(config, LaunchProfile::Fallback)
                        .await
                        .map_err(|fallback_err| {
                            ResearchError::SessionInit(format!(
                                "stealth launch: {stealth_err:#}; fallback launch: {fallback_err:#}"
                            ))
                        })?
                }
            };

        let session = Self {
            browser: Mutex::new(browser),
            handler,
            pages: Mutex::new(Vec::new()),
            user_data_dir: StdMutex::new(Some(user_data_dir)),
            user_agent: config.user_agent().to_string(),
            page_load_timeout: config.page_load_timeout(),
            script_timeout: config.script_timeout(),
        };

        let primary = session
            .new_masked_page()
            .await
            .map_err(|e| ResearchError::SessionInit(format!("{e:#}")))?;
        session.pages.lock().await.push(primary);

        info!("Browser session ready");
        Ok(session)
    }

    async fn new_masked_page(&self) -> Result<Page> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        let masked = page
            .execute(AddScriptToEvaluateOnNewDocumentParams {
                source: WEBDRIVER_MASK_SCRIPT.to_string(),
                include_command_line_api: None,
                world_name: None,
                run_immediately: None,
            })
            .await;
        if let Err(e) = masked {
            if let Err(close_err) = page.close().await {
                warn!("Failed to close unmasked page: {close_err}");
            }
            return Err(anyhow!(e).context("Failed to install webdriver mask"));
        }

        if !self.user_agent.is_empty()
            && let Err(e) = page.set_user_agent(self.user_agent.as_str()).await
        {
            debug!("User agent override failed: {e}");
        }

        Ok(page)
    }

    async fn current_page(&self) -> Result<Page> {
        self.pages
            .lock()
            .await
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("No open tab"))
    }

    /// Close the browser, wait for the process to exit and remove the profile directory.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down browser session");

        self.pages.lock().await.clear();

        {
            let mut browser = self.browser.lock().await;
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser cleanly: {e}");
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {e}");
            }
        }

        self.handler.abort();
        self.cleanup_temp_dir();
        Ok(())
    }

    fn cleanup_temp_dir(&self) {
        let path = match self.user_data_dir.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(path) = path {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser::drop kills the Chrome process if shutdown() was skipped
        self.cleanup_temp_dir();
    }
}

async fn close_page(page: Page) -> Result<()> {
    page.close().await.context("Failed to close tab")
}

/// Close the newest tracked tab. It stays tracked unless the close succeeds,
/// so `tab_count` keeps reporting tabs that are still open in the browser.
async fn close_last<T, F, Fut>(pages: &mut Vec<T>, close: F) -> Result<()>
where
    T: Clone,
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let Some(page) = pages.last().cloned() else {
        return Ok(());
    };
    close(page).await?;
    pages.pop();
    Ok(())
}

/// Collects `{text, href, url}` for every match of a selector
fn query_script(selector: &str) -> Result<String> {
    let selector = serde_json::to_string(selector)?;
    Ok(format!(
        r"(() => Array.from(document.querySelectorAll({selector})).map(el => ({{
            text: el.innerText || el.textContent || '',
            href: el.getAttribute('href'),
            url: typeof el.href === 'string' && el.href.length > 0 ? el.href : null
        }})))()"
    ))
}

#[async_trait]
impl BrowseSession for ChromiumSession {
    async fn is_alive(&self) -> bool {
        let browser = self.browser.lock().await;
        match tokio::time::timeout(Duration::from_secs(5), browser.version()).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Browser health check failed: {e}");
                false
            }
            Err(_) => {
                debug!("Browser health check timed out");
                false
            }
        }
    }

    async fn goto(&self, url: &str) -> Result<()> {
        let page = self.current_page().await?;
        page.goto(url)
            .await
            .with_context(|| format!("Navigation to {url} failed"))?;
        Ok(())
    }

    async fn query(&self, selector: &str) -> Result<Vec<ElementSnapshot>> {
        let page = self.current_page().await?;
        let script = query_script(selector)?;
        let result = tokio::time::timeout(self.script_timeout, page.evaluate(script))
            .await
            .map_err(|_| anyhow!("Query '{selector}' timed out"))?
            .with_context(|| format!("Query '{selector}' failed"))?;
        result
            .into_value::<Vec<ElementSnapshot>>()
            .with_context(|| format!("Query '{selector}' returned malformed data"))
    }

    async fn current_url(&self) -> Result<String> {
        let page = self.current_page().await?;
        Ok(page.url().await?.unwrap_or_default())
    }

    async fn title(&self) -> Result<String> {
        let page = self.current_page().await?;
        Ok(page.get_title().await?.unwrap_or_default())
    }

    async fn open_tab(&self, url: &str) -> Result<()> {
        let page = self.new_masked_page().await?;
        self.pages.lock().await.push(page.clone());

        match tokio::time::timeout(self.page_load_timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            // Still loading; the caller waits for content on its own budget
            Err(_) => {
                debug!("Tab for {url} still loading after {:?}", self.page_load_timeout);
                Ok(())
            }
            Ok(Err(e)) => {
                let mut pages = self.pages.lock().await;
                if let Err(close_err) = close_last(&mut pages, close_page).await {
                    warn!("Failed to close tab after failed open: {close_err:#}");
                }
                bail!("Opening tab for {url} failed: {e}")
            }
        }
    }

    async fn close_current_tab(&self) -> Result<()> {
        let mut pages = self.pages.lock().await;
        if pages.len() <= 1 {
            bail!("Refusing to close the primary tab");
        }
        close_last(&mut pages, close_page).await?;
        if let Some(primary) = pages.first() {
            primary
                .bring_to_front()
                .await
                .context("Failed to focus primary tab")?;
        }
        Ok(())
    }

    async fn tab_count(&self) -> Result<usize> {
        Ok(self.pages.lock().await.len())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        let page = self.current_page().await?;
        page.screenshot(CaptureScreenshotParams {
            format: Some(CaptureScreenshotFormat::Png),
            capture_beyond_viewport: Some(true),
            ..Default::default()
        })
        .await
        .context("Screenshot failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_script_escapes_selector() {
        let script = query_script(r#"a[href="x"]"#).unwrap();
        assert!(script.contains(r#""a[href=\"x\"]""#));
    }

    #[tokio::test]
    async fn failed_close_keeps_tab_tracked() {
        let mut pages = vec!["primary", "article"];
        let result = close_last(&mut pages, |_| async { Err(anyhow!("target crashed")) }).await;

        assert!(result.is_err());
        assert_eq!(pages, ["primary", "article"]);
    }

    #[tokio::test]
    async fn successful_close_untracks_newest_tab() {
        let mut closed = None;
        close_last(&mut vec!["primary", "article"], |page| {
            closed = Some(page);
            async { Ok(()) }
        })
        .await
        .unwrap();
        assert_eq!(closed, Some("article"));

        let mut pages = vec!["primary", "article"];
        close_last(&mut pages, |_| async { Ok(()) }).await.unwrap();
        assert_eq!(pages, ["primary"]);
    }

    #[test]
    fn profiles_have_distinct_names() {
        assert_ne!(
            LaunchProfile::Stealth.as_str(),
            LaunchProfile::Fallback.as_str()
        );
    }
}
