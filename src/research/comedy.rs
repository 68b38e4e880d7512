//! Trending topics and the late-night comedy script

use chrono::Local;
use rand::Rng;
use std::fmt::Write as _;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::{DeepResearcher, TOPIC_BROWSE_BUDGET};
use crate::error::ResearchResult;
use crate::extractor::extract;
use crate::llm::Trend;
use crate::navigation::Navigator;
use crate::orchestrator::SearchRequest;
use crate::output::{RunDirectory, save_json, save_screenshot, save_text, write_file};
use crate::session::BrowseSession;
use crate::utils::{format_time_elapsed, safe_truncate_chars};

pub const TRENDS_URL: &str = "https://trends.google.com/trends/trendingsearches/daily";
const TRENDS_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(45);
const TRENDS_SCREENSHOT_FILE: &str = "google_trends.png";
const TRENDS_RAW_FILE: &str = "google_trends_raw.txt";
const TRENDS_JSON_FILE: &str = "extracted_trends.json";

/// Page text must be longer than this before asking the model for trends
const MIN_TRENDS_PAGE_CHARS: usize = 200;
/// Fewer extracted trends than this falls back to the canned list
const MIN_EXTRACTED_TRENDS: usize = 5;
const SCRIPT_SEGMENTS: usize = 5;
const ARTICLES_PER_TREND: usize = 2;
const TREND_CONTENT_PREVIEW: usize = 500;

pub const FALLBACK_TRENDS: [&str; 10] = [
    "Ukraine Russia conflict",
    "Presidential election polls",
    "NFL scores",
    "Taylor Swift concert tickets",
    "Stock market today",
    "COVID variant symptoms",
    "Hurricane forecast",
    "iPhone 16 release date",
    "Gas prices",
    "Netflix new shows",
];

/// Canned trends with a random `"<100..=500>K+ searches"` volume each
#[must_use]
pub fn fallback_trends() -> Vec<Trend> {
    let mut rng = rand::rng();
    FALLBACK_TRENDS
        .iter()
        .enumerate()
        .map(|(i, title)| {
            info!("Using fallback trend: {title}");
            Trend::new(
                i + 1,
                *title,
                format!("{}K+ searches", rng.random_range(100..=500)),
            )
        })
        .collect()
}

impl<S: BrowseSession> DeepResearcher<S> {
    /// Read today's trending searches for `region`.
    ///
    /// Always yields a list; any failure along the way returns
    /// [`fallback_trends`].
    pub async fn visit_trends(&self, region: &str) -> Vec<Trend> {
        info!("Visiting Google Trends for region {region}");

        let url = format!("{TRENDS_URL}?geo={region}");
        let navigator = Navigator::from_config(&self.config);
        if !navigator
            .navigate(&self.session, &url, TRENDS_NAVIGATION_TIMEOUT)
            .await
        {
            warn!("Failed to navigate to Google Trends");
            return fallback_trends();
        }

        let output_dir = self.config.output_dir();
        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            warn!("Failed to create {}: {e}", output_dir.display());
        }

        if self.config.capture_screenshots() {
            match self.session.screenshot().await {
                Ok(png) => {
                    save_screenshot(&png, &output_dir.join(TRENDS_SCREENSHOT_FILE)).await;
                }
                Err(e) => warn!("Trends screenshot failed: {e:#}"),
            }
        }

        let extraction = extract(&self.session, self.config.acceptance_threshold()).await;
        save_text(&extraction.text, &output_dir.join(TRENDS_RAW_FILE)).await;

        if extraction.char_count() > MIN_TRENDS_PAGE_CHARS {
            info!("Extracting trending topics using LLM");
            let trends = self.llm.extract_trends(&extraction.text).await;
            if trends.len() >= MIN_EXTRACTED_TRENDS {
                info!("Successfully extracted {} trends", trends.len());
                if let Err(e) = save_json(&trends, &output_dir.join(TRENDS_JSON_FILE)).await {
                    warn!("Failed to save extracted trends: {e:#}");
                }
                return trends;
            }
        }

        warn!("Using fallback trends due to extraction failure");
        fallback_trends()
    }

    /// Research the top trends and write a dated late-night script.
    ///
    /// The script lands in `comedy_script_YYYYMMDD.md` under the output
    /// directory; the text is returned as well.
    pub async fn generate_comedy_script(&self) -> ResearchResult<String> {
        info!("Generating late-night comedy show script");
        let start = Instant::now();

        let trends = self.visit_trends("US").await;
        let today = Local::now().format("%A, %B %d, %Y");
        let mut script = format!(
            "# Tonight's Trending Topics - {today}\n\n\
             Welcome to Tonight's Trends for {today}! We've got some wild searches happening today, folks. Let's dive in!\n\n"
        );

        for trend in trends.iter().take(SCRIPT_SEGMENTS) {
            info!("Creating comedy segment for trend: {}", trend.title);
            let research = self.research_trend(trend).await?;
            let joke = self.llm.create_comedy_summary(&trend.title, &research).await;
            let _ = write!(
                script,
                "## Trending at #{}: {}\n*Search volume: {}*\n\n{joke}\n\n",
                trend.rank, trend.title, trend.volume
            );
        }

        info!("Adding daily facts to script");
        let facts = self.llm.generate_daily_facts().await;
        let _ = write!(script, "## Today's Fascinating Facts\n\n{facts}\n\n");

        let path = self
            .config
            .output_dir()
            .join(format!("comedy_script_{}.md", Local::now().format("%Y%m%d")));
        write_file(&path, &script).await?;
        info!(
            "Comedy script saved to {} after {}",
            path.display(),
            format_time_elapsed(start.elapsed().as_secs_f64())
        );

        Ok(script)
    }

    /// News browse for one trend, flattened into a research blurb
    async fn research_trend(&self, trend: &Trend) -> ResearchResult<String> {
        let dir = RunDirectory::create(self.config.output_dir(), "trend", &trend.title).await?;
        let articles = self
            .browse(
                &SearchRequest::news(&trend.title, TOPIC_BROWSE_BUDGET),
                ARTICLES_PER_TREND,
                &dir,
            )
            .await;

        if articles.is_empty() {
            return Ok(format!(
                "Research on {} yielded limited information from web sources.",
                trend.title
            ));
        }

        let mut research = format!("Trend: {}\n\n", trend.title);
        for (i, article) in articles.iter().enumerate() {
            let _ = write!(
                research,
                "Article {}: {}\nSource: {}\nContent: {}...\n\n",
                i + 1,
                article.title,
                article.url,
                safe_truncate_chars(&article.content, TREND_CONTENT_PREVIEW)
            );
        }
        Ok(research)
    }
}
