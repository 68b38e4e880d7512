//! Request, record and phase types for a browse run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::extractor::{ExtractionMetadata, ExtractionStrategy};
use crate::navigation::SearchKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub kind: SearchKind,
    /// Overall budget for search, harvesting and every candidate visit
    pub time_budget: Duration,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>, kind: SearchKind, time_budget: Duration) -> Self {
        Self {
            query: query.into(),
            kind,
            time_budget,
        }
    }

    #[must_use]
    pub fn web(query: impl Into<String>, time_budget: Duration) -> Self {
        Self::new(query, SearchKind::Web, time_budget)
    }

    #[must_use]
    pub fn news(query: impl Into<String>, time_budget: Duration) -> Self {
        Self::new(query, SearchKind::News, time_budget)
    }
}

/// An accepted article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Anchor text the link was discovered under
    pub title: String,
    pub url: String,
    pub content: String,
    pub strategy: ExtractionStrategy,
    pub metadata: ExtractionMetadata,
    /// PNG bytes
    #[serde(skip)]
    pub screenshot: Option<Vec<u8>>,
}

/// Where a browse run currently is; `usize` is the zero-based candidate index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowsePhase {
    #[default]
    Idle,
    Searching,
    Harvesting,
    Visiting(usize),
    Extracting(usize),
    Done,
}

impl fmt::Display for BrowsePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Searching => f.write_str("searching"),
            Self::Harvesting => f.write_str("harvesting"),
            Self::Visiting(i) => write!(f, "visiting #{}", i + 1),
            Self::Extracting(i) => write!(f, "extracting #{}", i + 1),
            Self::Done => f.write_str("done"),
        }
    }
}
