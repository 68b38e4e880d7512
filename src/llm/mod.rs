//! Language-model backend access
//!
//! `client` speaks the Ollama generate API, `prompts` builds the research and
//! comedy prompts on top of it and `trends` parses trend lists out of replies.

mod client;
mod prompts;
mod trends;

pub use client::{GenerateRequest, LlmClient};
pub use prompts::{ArticleSummary, condense_for_summary, is_ai_related, is_complex_query};
pub use trends::{MAX_TRENDS, Trend, parse_trend_lines, parse_trends};
