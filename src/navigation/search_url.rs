//! Search engine URL construction

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Which result vertical to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    #[default]
    Web,
    /// Past-week news results
    News,
}

impl SearchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::News => "news",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the results URL for `query` against the engine at `base`.
///
/// Web: `?q=<query>&t=h_`. News adds `&df=w&iar=news&ia=news`.
pub fn build_search_url(base: &str, query: &str, kind: SearchKind) -> Result<Url> {
    let mut url = Url::parse(base).with_context(|| format!("Invalid search engine URL: {base}"))?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("q", query).append_pair("t", "h_");
        if kind == SearchKind::News {
            pairs
                .append_pair("df", "w")
                .append_pair("iar", "news")
                .append_pair("ia", "news");
        }
    }
    Ok(url)
}
