//! URL filters applied to every harvested anchor

use crate::config::ResearchConfig;
use crate::utils::{is_valid_url, matches_any_site, registrable_host};

#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    engine_host: String,
    blocked_sites: Vec<String>,
    filter_blocked: bool,
}

impl LinkFilter {
    #[must_use]
    pub fn new(engine_host: impl Into<String>, blocked_sites: Vec<String>) -> Self {
        Self {
            engine_host: engine_host.into().to_ascii_lowercase(),
            blocked_sites,
            filter_blocked: true,
        }
    }

    #[must_use]
    pub fn from_config(config: &ResearchConfig) -> Self {
        Self::new(config.search_engine_host(), config.blocked_sites().to_vec())
    }

    /// Toggle blocklist filtering; engine and scheme filters always apply
    #[must_use]
    pub fn filter_blocked(mut self, enabled: bool) -> Self {
        self.filter_blocked = enabled;
        self
    }

    /// `javascript:` pseudo-links and in-page fragments, judged on the raw attribute
    #[must_use]
    pub fn is_inert_href(raw_href: &str) -> bool {
        let raw = raw_href.trim();
        raw.is_empty()
            || raw.starts_with('#')
            || raw
                .get(..11)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
    }

    /// Link points back at the search engine itself
    #[must_use]
    pub fn is_engine_link(&self, url: &str) -> bool {
        if self.engine_host.is_empty() {
            return false;
        }
        match registrable_host(url) {
            Some(host) => {
                host == self.engine_host || host.ends_with(&format!(".{}", self.engine_host))
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_blocked(&self, url: &str) -> bool {
        self.filter_blocked && matches_any_site(url, &self.blocked_sites)
    }

    /// URL-level acceptance shared by every discovery strategy
    #[must_use]
    pub fn accepts(&self, raw_href: &str, resolved: &str) -> bool {
        !Self::is_inert_href(raw_href)
            && is_valid_url(resolved)
            && !self.is_engine_link(resolved)
            && !self.is_blocked(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> LinkFilter {
        LinkFilter::new(
            "duckduckgo.com",
            vec!["medium.com".to_string(), "wsj.com".to_string()],
        )
    }

    #[test]
    fn inert_hrefs() {
        assert!(LinkFilter::is_inert_href("#top"));
        assert!(LinkFilter::is_inert_href("JavaScript:void(0)"));
        assert!(LinkFilter::is_inert_href("   "));
        assert!(!LinkFilter::is_inert_href("/page#section"));
        assert!(!LinkFilter::is_inert_href("https://example.com"));
    }

    #[test]
    fn engine_links_and_subdomains_rejected() {
        let f = filter();
        assert!(f.is_engine_link("https://duckduckgo.com/?q=x"));
        assert!(f.is_engine_link("https://links.duckduckgo.com/d.js"));
        assert!(!f.is_engine_link("https://notduckduckgo.com/"));
    }

    #[test]
    fn blocklist_respects_toggle() {
        let f = filter();
        assert!(!f.accepts("https://medium.com/p/1", "https://medium.com/p/1"));
        let f = f.filter_blocked(false);
        assert!(f.accepts("https://medium.com/p/1", "https://medium.com/p/1"));
    }

    #[test]
    fn non_http_schemes_rejected() {
        let f = filter();
        assert!(!f.accepts("mailto:a@b.c", "mailto:a@b.c"));
        assert!(f.accepts("/story", "https://news.example.org/story"));
    }
}
