//! Whitespace normalization for extracted text

use regex::Regex;
use std::sync::LazyLock;

static BLANK_LINE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n").expect("BUG: hardcoded blank-line regex is invalid")
});

static REPEATED_PARAGRAPH_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\n\n){2,}").expect("BUG: hardcoded paragraph-break regex is invalid")
});

/// Normalize whitespace in extracted page text.
///
/// Trims, turns tabs into spaces and carriage returns into newlines, then
/// collapses any whitespace run spanning two or more newlines into exactly
/// one blank line. `clean(clean(x)) == clean(x)`.
///
/// ```
/// # use deep_researcher::extractor::clean;
/// assert_eq!(clean("  Title\r\n\r\n\r\n\tBody  "), "Title\n\n Body");
/// ```
#[must_use]
pub fn clean(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let normalized = trimmed.replace('\t', " ").replace('\r', "\n");
    let collapsed = BLANK_LINE_RUN.replace_all(&normalized, "\n\n");
    REPEATED_PARAGRAPH_BREAKS
        .replace_all(&collapsed, "\n\n")
        .into_owned()
}
