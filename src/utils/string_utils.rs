//! UTF-8-safe string helpers
//!
//! Truncation here always counts characters, never bytes, so slicing text
//! scraped from arbitrary pages cannot panic on a multi-byte boundary.

use regex::Regex;
use std::sync::LazyLock;

static INVALID_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\\/*?:"<>|]"#).expect("BUG: hardcoded filename regex is invalid")
});

static FILENAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_]+").expect("BUG: hardcoded separator regex is invalid"));

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// # Examples
/// ```
/// # use deep_researcher::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Last `max_chars` characters of `s`.
#[inline]
pub fn safe_tail_chars(s: &str, max_chars: usize) -> &str {
    let total = s.chars().count();
    if total <= max_chars {
        return s;
    }
    match s.char_indices().nth(total - max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[byte_idx..],
    }
}

/// Truncate long text while preserving its beginning and end.
///
/// Text at or under `max_length` characters is returned unchanged. Otherwise the
/// first `keep_start` and last `keep_end` characters are kept around a marker.
/// When `keep_start + keep_end` exceeds `max_length` both are scaled down
/// proportionally.
#[must_use]
pub fn truncate_text(text: &str, max_length: usize, keep_start: usize, keep_end: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let (mut keep_start, mut keep_end) = (keep_start, keep_end);
    if keep_start + keep_end > max_length {
        let ratio = max_length as f64 / (keep_start + keep_end) as f64;
        keep_start = (keep_start as f64 * ratio) as usize;
        keep_end = (keep_end as f64 * ratio) as usize;
    }

    format!(
        "{}\n\n[...]\n\n{}",
        safe_truncate_chars(text, keep_start),
        safe_tail_chars(text, keep_end)
    )
}

/// Format a duration in seconds for humans.
///
/// ```
/// # use deep_researcher::utils::string_utils::format_time_elapsed;
/// assert_eq!(format_time_elapsed(12.34), "12.3 seconds");
/// assert_eq!(format_time_elapsed(125.0), "2 minutes, 5 seconds");
/// assert_eq!(format_time_elapsed(3725.0), "1 hours, 2 minutes, 5 seconds");
/// ```
#[must_use]
pub fn format_time_elapsed(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{seconds:.1} seconds");
    }
    let whole = seconds as u64;
    if seconds < 3600.0 {
        return format!("{} minutes, {} seconds", whole / 60, whole % 60);
    }
    let hours = whole / 3600;
    let remaining = whole % 3600;
    format!(
        "{} hours, {} minutes, {} seconds",
        hours,
        remaining / 60,
        remaining % 60
    )
}

/// Turn arbitrary text (a query, an article title) into a filesystem-safe stem.
///
/// Invalid path characters become underscores, runs of whitespace and
/// underscores collapse to one underscore, and the result is capped at 50
/// characters.
#[must_use]
pub fn clean_filename(name: &str) -> String {
    let replaced = INVALID_FILENAME_CHARS.replace_all(name, "_");
    let collapsed = FILENAME_SEPARATORS.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_').trim();
    safe_truncate_chars(trimmed, 50).to_string()
}
