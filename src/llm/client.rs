//! Ollama `/api/generate` client
//!
//! Every call returns text. Backend failures come back inline as
//! `"Error: ..."` strings so a run always produces a document.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::config::ResearchConfig;
use crate::error::{ResearchError, ResearchResult};

const DEFAULT_TEMPERATURE: f32 = 0.7;

/// One generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    /// Explicit model; overrides `use_reasoning`
    pub model: Option<String>,
    /// Route to the reasoning model instead of the basic one
    pub use_reasoning: bool,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub system: Option<String>,
    /// Overrides the client-wide timeout
    pub timeout: Option<Duration>,
}

impl GenerateRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            use_reasoning: false,
            max_tokens: None,
            temperature: DEFAULT_TEMPERATURE,
            system: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn reasoning(mut self, use_reasoning: bool) -> Self {
        self.use_reasoning = use_reasoning;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

pub struct LlmClient {
    http: Client,
    base_url: String,
    basic_model: String,
    reasoning_model: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(config: &ResearchConfig) -> ResearchResult<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| ResearchError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.ollama_url().trim_end_matches('/').to_string(),
            basic_model: config.ollama_model().to_string(),
            reasoning_model: config.reasoning_model().to_string(),
            timeout: config.llm_timeout(),
        })
    }

    #[must_use]
    pub fn basic_model(&self) -> &str {
        &self.basic_model
    }

    #[must_use]
    pub fn reasoning_model(&self) -> &str {
        &self.reasoning_model
    }

    fn select_model<'a>(&'a self, request: &'a GenerateRequest) -> &'a str {
        match (&request.model, request.use_reasoning) {
            (Some(model), _) => model,
            (None, true) => {
                info!("Using advanced reasoning model: {}", self.reasoning_model);
                &self.reasoning_model
            }
            (None, false) => &self.basic_model,
        }
    }

    /// Send one generation request and return the model's text.
    ///
    /// An empty prompt returns `""` without a network call.
    pub async fn query(&self, request: GenerateRequest) -> String {
        if request.prompt.is_empty() {
            warn!("Empty prompt provided");
            return String::new();
        }

        let model = self.select_model(&request);
        let body = OllamaRequest {
            model,
            prompt: &request.prompt,
            stream: false,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            system: request.system.as_deref(),
        };

        let start = Instant::now();
        info!(
            "Querying {model} with prompt of length {} chars",
            request.prompt.chars().count()
        );

        let response = match self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .timeout(request.timeout.unwrap_or(self.timeout))
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(
                    "Request error after {:.2}s: {e}",
                    start.elapsed().as_secs_f64()
                );
                return format!("Error: Failed to connect to LLM API ({e})");
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let detail = response.text().await.unwrap_or_default();
            error!("Error from LLM API: {} - {detail}", status.as_u16());
            return format!("Error: API returned status code {}", status.as_u16());
        }

        match response.json::<OllamaResponse>().await {
            Ok(parsed) => {
                info!(
                    "Received response of length {} chars in {:.2}s",
                    parsed.response.chars().count(),
                    start.elapsed().as_secs_f64()
                );
                parsed.response
            }
            Err(e) => {
                error!(
                    "Unexpected error after {:.2}s: {e}",
                    start.elapsed().as_secs_f64()
                );
                format!("Error: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = GenerateRequest::new("hi");
        assert_eq!(req.temperature, DEFAULT_TEMPERATURE);
        assert!(req.max_tokens.is_none());
        assert!(!req.use_reasoning);
    }

    #[test]
    fn wire_format_omits_unset_fields() {
        let body = OllamaRequest {
            model: "mistral",
            prompt: "p",
            stream: false,
            temperature: 0.5,
            max_tokens: None,
            system: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], false);
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("system").is_none());
    }

    #[test]
    fn explicit_model_wins_over_reasoning_flag() {
        let client = LlmClient::new(&ResearchConfig::default()).unwrap();
        let req = GenerateRequest::new("p").reasoning(true).model("llama3");
        assert_eq!(client.select_model(&req), "llama3");
        let req = GenerateRequest::new("p").reasoning(true);
        assert_eq!(client.select_model(&req), client.reasoning_model());
    }
}
