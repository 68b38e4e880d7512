//! URL utilities for link filtering and resolution.

use url::Url;

/// Check if a URL is a fetchable http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Resolve an `href` attribute against the page it was found on.
///
/// Absolute hrefs are returned as-is. Relative hrefs are joined onto `base`.
/// Returns `None` when neither parse succeeds.
#[must_use]
pub fn resolve_href(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    Url::parse(base)
        .ok()
        .and_then(|b| b.join(href).ok())
        .map(|u| u.to_string())
}

/// Host of `url` without a leading `www.`
#[must_use]
pub fn registrable_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.trim_start_matches("www.").to_string())
}

/// Case-insensitive substring match against a list of site fragments.
///
/// Blocklist entries are matched anywhere in the URL, so `medium.com` also
/// blocks `https://example.medium.com/post`.
#[must_use]
pub fn matches_any_site(url: &str, sites: &[String]) -> bool {
    let lowered = url.to_lowercase();
    sites
        .iter()
        .any(|site| !site.is_empty() && lowered.contains(&site.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_urls() {
        assert!(is_valid_url("https://example.com/a"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url("mailto:a@b.c"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn resolves_relative_hrefs() {
        assert_eq!(
            resolve_href("https://duckduckgo.com/?q=x", "/about").as_deref(),
            Some("https://duckduckgo.com/about")
        );
        assert_eq!(
            resolve_href("https://duckduckgo.com/", "https://rust-lang.org/").as_deref(),
            Some("https://rust-lang.org/")
        );
        assert_eq!(resolve_href("not a url", "also not"), None);
    }

    #[test]
    fn host_strips_www() {
        assert_eq!(
            registrable_host("https://www.DuckDuckGo.com/?q=1").as_deref(),
            Some("duckduckgo.com")
        );
    }

    #[test]
    fn site_matching_is_case_insensitive() {
        let sites = vec!["medium.com".to_string()];
        assert!(matches_any_site("https://blog.MEDIUM.com/x", &sites));
        assert!(!matches_any_site("https://rust-lang.org", &sites));
    }
}
