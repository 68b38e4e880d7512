//! Research, comedy and trend prompts built on `LlmClient::query`

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::info;

use super::client::{GenerateRequest, LlmClient};
use super::trends::{Trend, parse_trends};
use crate::utils::{safe_truncate_chars, truncate_text};

/// Article text longer than this is cut to head + tail before summarizing
const SUMMARY_INPUT_LIMIT: usize = 8000;
const SUMMARY_HEAD_CHARS: usize = 6000;
const SUMMARY_TAIL_CHARS: usize = 2000;
const TREND_INPUT_LIMIT: usize = 8000;
const COMEDY_RESEARCH_LIMIT: usize = 2000;

/// Query terms that route article summaries through the reasoning model
const COMPLEX_QUERY_TERMS: &[&str] = &[
    "best",
    "compare",
    "thinking",
    "reasoning",
    "llm",
    "model",
    "artificial intelligence",
    "ai",
];

/// Topic terms that get the two-pass AI research report
const AI_TOPIC_TERMS: &[&str] = &[
    "llm",
    "language model",
    "ai model",
    "neural network",
    "deep learning",
    "machine learning",
    "artificial intelligence",
    "thinking",
    "reasoning",
    "gpt",
    "llama",
    "mistral",
    "deepseek",
];

/// Summary of one source, as fed into the report prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// Substring match against the term list; `ai` also matches inside words
#[must_use]
pub fn is_complex_query(query: &str) -> bool {
    let lowered = query.to_lowercase();
    COMPLEX_QUERY_TERMS.iter().any(|t| lowered.contains(t))
}

#[must_use]
pub fn is_ai_related(topic: &str) -> bool {
    let lowered = topic.to_lowercase();
    AI_TOPIC_TERMS.iter().any(|t| lowered.contains(t))
}

/// Head 6000 + `[...]` + tail 2000 for content over 8000 characters
#[must_use]
pub fn condense_for_summary(content: &str) -> String {
    truncate_text(
        content,
        SUMMARY_INPUT_LIMIT,
        SUMMARY_HEAD_CHARS,
        SUMMARY_TAIL_CHARS,
    )
}

fn format_sources(summaries: &[ArticleSummary]) -> String {
    let mut formatted = String::new();
    for (i, s) in summaries.iter().enumerate() {
        let _ = write!(
            formatted,
            "SOURCE {}: {}\nURL: {}\nSUMMARY: {}\n\n",
            i + 1,
            if s.title.is_empty() { "Untitled" } else { &s.title },
            if s.url.is_empty() { "Unknown" } else { &s.url },
            s.summary
        );
    }
    formatted
}

impl LlmClient {
    /// Summarize one article with respect to `topic`.
    ///
    /// With `use_reasoning` the basic model summarizes first and the reasoning
    /// model then analyses that summary.
    pub async fn summarize_content(
        &self,
        content: &str,
        topic: &str,
        title: &str,
        url: &str,
        use_reasoning: bool,
    ) -> String {
        let title = if title.is_empty() { "Untitled" } else { title };
        let url = if url.is_empty() { "Unknown" } else { url };
        let prompt = format!(
            "Summarize the following article about '{topic}' in a concise paragraph.
Focus on key facts, developments, and relevance.
Ignore any advertisements, navigation elements, or unrelated content.

ARTICLE TITLE: {title}
SOURCE URL: {url}

ARTICLE TEXT:
{}

SUMMARY:",
            condense_for_summary(content)
        );

        if !use_reasoning {
            return self
                .query(
                    GenerateRequest::new(prompt)
                        .system("You are a precise summarizer who extracts the most relevant information.")
                        .temperature(0.3),
                )
                .await;
        }

        let basic_summary = self
            .query(
                GenerateRequest::new(prompt)
                    .system("You are a technical summarizer extracting key information.")
                    .temperature(0.3),
            )
            .await;

        let enhanced = format!(
            "Now think deeply about the following content that has been summarized from an article about '{topic}'.
Extract specific technical details, model names, benchmarks, and key performance metrics.

ARTICLE SUMMARY: {basic_summary}

DETAILED TECHNICAL ANALYSIS:"
        );

        self.query(
            GenerateRequest::new(enhanced)
                .system(
                    "You are a technical AI expert who precisely analyzes information with a focus on specific details and technical accuracy.",
                )
                .temperature(0.3)
                .reasoning(true),
        )
        .await
    }

    /// Synthesize per-source summaries into a report.
    pub async fn create_research_report(&self, topic: &str, summaries: &[ArticleSummary]) -> String {
        let sources = format_sources(summaries);

        if !is_ai_related(topic) {
            let prompt = format!(
                "Create a comprehensive research report about \"{topic}\" based on the following sources.

SOURCES:
{sources}
Your report should:
1. Start with a brief introduction to the topic
2. Synthesize the main points from all sources
3. Note any contradictions or differing perspectives between sources
4. Include specific facts, figures, and quotes when relevant
5. End with a conclusion that summarizes key insights

FORMAT:
- Use clear headings for sections
- Organize information logically
- Include citations to specific sources when appropriate

RESEARCH REPORT:"
            );
            return self
                .query(
                    GenerateRequest::new(prompt)
                        .system("You are a thorough researcher who creates balanced, comprehensive reports.")
                        .max_tokens(2048)
                        .temperature(0.5),
                )
                .await;
        }

        info!("Creating initial summary with basic model for AI-related topic");
        let synthesis_prompt = format!(
            "Synthesize the key information from these sources about \"{topic}\":

{sources}
Highlight the most important facts, figures, and findings."
        );
        let synthesis = self
            .query(
                GenerateRequest::new(synthesis_prompt)
                    .system("You extract and synthesize key information from multiple sources.")
                    .temperature(0.3),
            )
            .await;

        info!("Using advanced reasoning model for final AI-related report");
        let report_prompt = format!(
            "Create a comprehensive, detailed research report about \"{topic}\" based on this synthesized information:

{synthesis}

IMPORTANT: If the query is about the \"best\" models or technologies:
1. Provide specific, concrete rankings or comparisons rather than general statements
2. Mention key metrics like parameter count, context window size, and benchmark performance
3. Discuss licensing and accessibility considerations
4. Address specific capabilities like reasoning, programming, and mathematical problem-solving

Your report should:
1. Start with a nuanced introduction explaining what makes a model \"best\" depends on requirements
2. Evaluate the main points plus your knowledge of state-of-the-art models
3. End with specific recommendations based on different use cases

FORMAT:
- Use clear headings for sections
- Present a balanced, thorough analysis with concrete details

RESEARCH REPORT:"
        );
        self.query(
            GenerateRequest::new(report_prompt)
                .system(
                    "You are an AI research expert who creates balanced, comprehensive reports with specific technical details and up-to-date knowledge about state-of-the-art models.",
                )
                .max_tokens(3072)
                .temperature(0.3)
                .reasoning(true),
        )
        .await
    }

    /// Report from the model's prior knowledge when browsing found nothing.
    ///
    /// Always ends with a note flagging the lower confidence.
    pub async fn create_fallback_report(&self, query: &str) -> String {
        let prompt = format!(
            "Create a brief informational summary about \"{query}\" based on your knowledge.

Include:
1. A general description of what \"{query}\" is
2. Key facts or aspects related to the topic
3. Any significant recent developments if applicable
4. Areas where more research would be valuable

Note: This should be fact-based information about {query}, not speculative.
If you don't have sufficient information about this topic, acknowledge the limitations.

Format as a brief report with clear sections."
        );

        let report = self
            .query(
                GenerateRequest::new(prompt)
                    .system(format!(
                        "You are a researcher providing accurate information about '{query}' based on your knowledge."
                    ))
                    .temperature(0.3),
            )
            .await;

        format!(
            "{report}\n\n**Note:** This report was generated with limited web research information \
             and is based primarily on the LLM's prior knowledge about '{query}'. \
             The information may not reflect the very latest developments."
        )
    }

    /// Two or three sentence late-night joke about a trending topic
    pub async fn create_comedy_summary(&self, topic: &str, research: &str) -> String {
        let prompt = format!(
            "You are a late-night comedy show writer. Create a brief, funny joke or monologue bit about this trending topic.
Be witty, topical, and slightly irreverent - similar to popular late-night hosts.
Keep it to 2-3 sentences maximum. Make it punchy and audience-ready.

Use the research information to make the joke current and topical.
Reference specific details from the research if possible.

Trending topic: {topic}
Research information: {}

Your late-night joke:",
            safe_truncate_chars(research, COMEDY_RESEARCH_LIMIT)
        );

        self.query(
            GenerateRequest::new(prompt)
                .system("You are a comedy writer for a late-night TV show.")
                .temperature(0.8),
        )
        .await
    }

    /// Three facts about today's date
    pub async fn generate_daily_facts(&self) -> String {
        let today = Local::now().format("%B %d, %Y");
        let prompt = format!(
            "Generate 3 interesting and surprising facts about today ({today}).
These should be real facts about historical events, celebrity birthdays, or unusual holidays.
Make them somewhat obscure but verifiable, and word them in an engaging way."
        );

        self.query(
            GenerateRequest::new(prompt)
                .system("You provide accurate historical facts about specific dates.")
                .temperature(0.7),
        )
        .await
    }

    /// Ask the model to pull ranked trends out of a trends page's text
    pub async fn extract_trends(&self, content: &str) -> Vec<Trend> {
        let prompt = format!(
            "You are helping to extract trending topics from Google Trends page content.
Identify the top trending searches from the provided text.
For each trend, provide the search term and search volume if available.

Format your response as a structured list of JSON objects:
[
  {{
    \"rank\": 1,
    \"title\": \"Trending Topic Name\",
    \"volume\": \"xxx searches\" (if available, otherwise \"Unknown\")
  }},
  ...
]

Include only the JSON array, nothing else.

Here's the content:
{}",
            safe_truncate_chars(content, TREND_INPUT_LIMIT)
        );

        let reply = self
            .query(
                GenerateRequest::new(prompt)
                    .system("You extract structured data from text. Respond with valid JSON only.")
                    .temperature(0.3),
            )
            .await;

        parse_trends(&reply)
    }
}
