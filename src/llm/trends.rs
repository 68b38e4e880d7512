//! Trending-topic parsing from model replies

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, error};

pub const MAX_TRENDS: usize = 10;
const UNKNOWN_VOLUME: &str = "Unknown";

static JSON_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("BUG: hardcoded JSON array regex is invalid")
});

static RANKED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(\d+)[.:)]\s+(.+?)(?:\s+-\s+|:\s+|$)")
        .expect("BUG: hardcoded ranked line regex is invalid")
});

static VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+[Kk]?\+?\s*(?:searches|views|results)")
        .expect("BUG: hardcoded volume regex is invalid")
});

const SKIPPED_PREFIXES: &[&str] = &["Summary", "Note:", "These are"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub rank: usize,
    pub title: String,
    pub volume: String,
}

impl Trend {
    #[must_use]
    pub fn new(rank: usize, title: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            rank,
            title: title.into(),
            volume: volume.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTrend {
    #[serde(default)]
    rank: Option<serde_json::Value>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    volume: Option<String>,
}

fn rank_of(value: Option<&serde_json::Value>) -> Option<usize> {
    match value? {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().trim_start_matches('#').parse().ok(),
        _ => None,
    }
}

/// Parse trends from a model reply.
///
/// Prefers a JSON array of `{rank, title, volume}` objects anywhere in the
/// reply; falls back to reading numbered lines. At most ten trends.
#[must_use]
pub fn parse_trends(reply: &str) -> Vec<Trend> {
    let candidate = JSON_ARRAY
        .find(reply)
        .map_or(reply, |m| m.as_str());

    match serde_json::from_str::<Vec<RawTrend>>(candidate) {
        Ok(raw) => raw
            .into_iter()
            .filter(|t| !t.title.trim().is_empty())
            .enumerate()
            .map(|(i, t)| Trend {
                rank: rank_of(t.rank.as_ref()).unwrap_or(i + 1),
                title: t.title.trim().to_string(),
                volume: t
                    .volume
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_VOLUME.to_string()),
            })
            .take(MAX_TRENDS)
            .collect(),
        Err(e) => {
            error!("Failed to parse JSON from LLM response: {e}");
            parse_trend_lines(candidate)
        }
    }
}

/// Line-oriented fallback for replies that are not valid JSON
#[must_use]
pub fn parse_trend_lines(text: &str) -> Vec<Trend> {
    let mut trends = Vec::new();
    let mut next_rank = 1;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = RANKED_LINE.captures(line)
            && let Ok(rank) = caps[1].parse::<usize>()
        {
            let volume = VOLUME
                .find(line)
                .map_or_else(|| UNKNOWN_VOLUME.to_string(), |m| m.as_str().to_string());
            trends.push(Trend::new(rank, caps[2].trim(), volume));
            next_rank = rank.saturating_add(1);
        } else if trimmed.chars().count() > 5
            && !SKIPPED_PREFIXES.iter().any(|p| trimmed.starts_with(p))
        {
            trends.push(Trend::new(next_rank, trimmed, UNKNOWN_VOLUME));
            next_rank = next_rank.saturating_add(1);
        }

        if trends.len() >= MAX_TRENDS {
            break;
        }
    }

    debug!("Line fallback extracted {} trends", trends.len());
    trends
}
