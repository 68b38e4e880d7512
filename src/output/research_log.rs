//! Markdown research log kept alongside each run

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::report::local_timestamp;
use crate::orchestrator::ArticleRecord;

pub const RESEARCH_LOG_FILE: &str = "research_log.md";

#[derive(Debug, Clone)]
pub struct ResearchLog {
    path: PathBuf,
}

impl ResearchLog {
    /// Start a fresh log in `dir`, overwriting any previous one
    pub async fn create(dir: &Path, topic: &str) -> Result<Self> {
        let path = dir.join(RESEARCH_LOG_FILE);
        let header = format!(
            "# Research Log: {topic}\n\nDate: {}\n\n## Search Information\n- Topic: {topic}\n\n",
            local_timestamp()
        );
        tokio::fs::write(&path, header)
            .await
            .with_context(|| format!("Failed to create research log {}", path.display()))?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, text: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open research log {}", self.path.display()))?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    pub async fn log_search(&self, query: &str) -> Result<()> {
        self.append(&format!("## Web Search\n- Query: {query}\n\n"))
            .await
    }

    pub async fn log_articles(&self, articles: &[ArticleRecord]) -> Result<()> {
        let mut section = String::from("## Analyzed Articles\n\n");
        if articles.is_empty() {
            section.push_str("No articles were successfully analyzed.\n\n");
        }
        for (i, article) in articles.iter().enumerate() {
            let _ = write!(
                section,
                "### Article {}: {}\n- URL: {}\n- Extracted {} characters of text\n\n",
                i + 1,
                article.title,
                article.url,
                article.content.chars().count()
            );
        }
        self.append(&section).await
    }

    pub async fn log_summary(&self, title: &str, summary: &str) -> Result<()> {
        self.append(&format!("### Summary for {title}\n{summary}\n\n"))
            .await
    }

    pub async fn log_report(&self, report_file: &str) -> Result<()> {
        self.append(&format!(
            "\n## Research Report\nA comprehensive research report has been generated: [Research Report]({report_file})\n\n"
        ))
        .await
    }

    pub async fn log_fallback(&self, report_file: &str) -> Result<()> {
        self.append(&format!(
            "\n## Fallback Report\nDue to limited information, a basic report has been generated: [Basic Report]({report_file})\n\n"
        ))
        .await
    }

    /// Numbered `[title](url)` list
    pub async fn log_sources<'a>(
        &self,
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<()> {
        let mut section = String::from("\n## Sources Used\n");
        for (i, (title, url)) in sources.into_iter().enumerate() {
            let _ = writeln!(section, "{}. [{title}]({url})", i + 1);
        }
        self.append(&section).await
    }

    pub async fn log_completed(&self) -> Result<()> {
        self.append(&format!(
            "\n## Research Completed\nResearch completed at: {}\n",
            local_timestamp()
        ))
        .await
    }
}
