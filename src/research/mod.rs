//! Research workflows
//!
//! `DeepResearcher` ties one browse session, the LLM client and the output
//! directory together. Web research lives here; the trends and comedy
//! workflow is in `comedy`.

mod comedy;

pub use comedy::{FALLBACK_TRENDS, TRENDS_URL, fallback_trends};

use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::ResearchConfig;
use crate::error::ResearchResult;
use crate::llm::{ArticleSummary, LlmClient, is_complex_query};
use crate::orchestrator::{ArticleRecord, SearchRequest, browse_and_analyze};
use crate::output::{
    BASIC_REPORT_FILE, RESEARCH_REPORT_FILE, ResearchLog, RunDirectory, TOPIC_RESEARCH_FILE,
    write_file, write_report,
};
use crate::session::{BrowseSession, ChromiumSession};
use crate::utils::{format_time_elapsed, safe_truncate_chars};

/// Budget for the main research browse
pub const RESEARCH_BROWSE_BUDGET: Duration = Duration::from_secs(60);
/// Budget for topic and trend browses
pub const TOPIC_BROWSE_BUDGET: Duration = Duration::from_secs(45);

pub struct DeepResearcher<S: BrowseSession> {
    config: ResearchConfig,
    session: S,
    llm: LlmClient,
}

impl DeepResearcher<ChromiumSession> {
    /// Launch a browser and build a researcher around it.
    pub async fn launch(config: ResearchConfig) -> ResearchResult<Self> {
        let session = ChromiumSession::launch(&config).await?;
        Self::new(config, session)
    }

    /// Close the browser and remove its profile directory.
    pub async fn shutdown(&self) -> ResearchResult<()> {
        self.session.shutdown().await?;
        Ok(())
    }
}

impl<S: BrowseSession> DeepResearcher<S> {
    pub fn new(config: ResearchConfig, session: S) -> ResearchResult<Self> {
        let llm = LlmClient::new(&config)?;
        Ok(Self {
            config,
            session,
            llm,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    #[must_use]
    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    async fn browse(
        &self,
        request: &SearchRequest,
        target_count: usize,
        dir: &RunDirectory,
    ) -> Vec<ArticleRecord> {
        browse_and_analyze(&self.session, &self.config, request, target_count, Some(dir)).await
    }

    /// Research `query` on the web and write a report.
    ///
    /// Writes `research_report.md` when at least one article was accepted,
    /// otherwise a `basic_report.md` built from the model's prior knowledge.
    /// Returns the report body.
    pub async fn research_and_summarize(&self, query: &str, max_articles: usize) -> ResearchResult<String> {
        info!("Starting research on: {query}");
        let start = Instant::now();

        let dir = RunDirectory::create(self.config.output_dir(), "research", query).await?;
        let log = ResearchLog::create(dir.path(), query).await?;

        log.log_search(query).await?;
        let articles = self
            .browse(&SearchRequest::web(query, RESEARCH_BROWSE_BUDGET), max_articles, &dir)
            .await;
        log.log_articles(&articles).await?;

        let use_reasoning = is_complex_query(query);
        let mut summaries = Vec::with_capacity(articles.len());
        for article in &articles {
            let summary = self
                .llm
                .summarize_content(
                    &article.content,
                    query,
                    &article.title,
                    &article.url,
                    use_reasoning,
                )
                .await;
            log.log_summary(&article.title, &summary).await?;
            info!(
                "Successfully summarized article: {}",
                safe_truncate_chars(&article.title, 40)
            );
            summaries.push(ArticleSummary {
                title: article.title.clone(),
                url: article.url.clone(),
                summary,
            });
        }

        if summaries.is_empty() {
            warn!("Insufficient data collected for {query}");
            let report = self.llm.create_fallback_report(query).await;
            let path = dir.join(BASIC_REPORT_FILE);
            write_report(&path, &format!("Basic Information: {query}"), &report).await?;
            log.log_fallback(BASIC_REPORT_FILE).await?;
            log.log_completed().await?;
            info!(
                "Basic report saved to {} after {}",
                path.display(),
                format_time_elapsed(start.elapsed().as_secs_f64())
            );
            return Ok(report);
        }

        info!(
            "Generating research report for {query} based on {} articles",
            summaries.len()
        );
        let report = self.llm.create_research_report(query, &summaries).await;
        let path = dir.join(RESEARCH_REPORT_FILE);
        write_report(&path, &format!("Research Report: {query}"), &report).await?;

        log.log_report(RESEARCH_REPORT_FILE).await?;
        log.log_sources(summaries.iter().map(|s| (s.title.as_str(), s.url.as_str())))
            .await?;
        log.log_completed().await?;

        info!(
            "Research report saved to {} after {}",
            path.display(),
            format_time_elapsed(start.elapsed().as_secs_f64())
        );
        Ok(report)
    }

    /// Summarize each source found for `topic` into `topic_research.md`.
    pub async fn research_topic(&self, topic: &str, max_articles: usize) -> ResearchResult<String> {
        info!("Researching topic: {topic}");

        let dir = RunDirectory::create(self.config.output_dir(), "topic", topic).await?;
        let articles = self
            .browse(&SearchRequest::web(topic, TOPIC_BROWSE_BUDGET), max_articles, &dir)
            .await;
        let path = dir.join(TOPIC_RESEARCH_FILE);

        if articles.is_empty() {
            warn!("No articles successfully processed for {topic}");
            let message = format!("Research on {topic} yielded limited information from web sources.");
            write_file(&path, format!("# Research on: {topic}\n\n{message}")).await?;
            return Ok(message);
        }

        let mut text = format!("# Research on: {topic}\n\n");
        for (i, article) in articles.iter().enumerate() {
            let summary = self
                .llm
                .summarize_content(&article.content, topic, &article.title, &article.url, false)
                .await;
            let _ = write!(
                text,
                "## Source {}: {}\nURL: {}\n\n{summary}\n\n",
                i + 1,
                article.title,
                article.url
            );
        }

        write_file(&path, &text).await?;
        Ok(text)
    }
}
