//! Final report files

use anyhow::Result;
use chrono::Local;
use std::path::Path;

use super::files::write_file;

pub const RESEARCH_REPORT_FILE: &str = "research_report.md";
pub const BASIC_REPORT_FILE: &str = "basic_report.md";
pub const TOPIC_RESEARCH_FILE: &str = "topic_research.md";

/// `YYYY-MM-DD HH:MM:SS` in local time
#[must_use]
pub fn local_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Write `# {heading}`, a date line and `body` to `path`
pub async fn write_report(path: &Path, heading: &str, body: &str) -> Result<()> {
    let document = format!("# {heading}\n\nDate: {}\n\n{body}", local_timestamp());
    write_file(path, document).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn report_has_heading_and_date() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(RESEARCH_REPORT_FILE);
        write_report(&path, "Research Report: tokio", "Body text")
            .await
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("# Research Report: tokio"));
        assert_eq!(lines.next(), Some(""));
        assert!(lines.next().is_some_and(|l| l.starts_with("Date: ")));
        assert!(text.ends_with("Body text"));
    }
}
