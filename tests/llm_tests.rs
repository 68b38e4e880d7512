//! Ollama client behaviour against a mock HTTP server

use deep_researcher::llm::ArticleSummary;
use deep_researcher::{GenerateRequest, LlmClient, ResearchConfig};
use mockito::{Matcher, Server};
use serde_json::json;

fn client_for(url: &str) -> LlmClient {
    let config = ResearchConfig::builder()
        .ollama_url(url)
        .ollama_model("mistral")
        .reasoning_model("deepseek-r1")
        .llm_timeout_secs(5)
        .build()
        .unwrap();
    LlmClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_query_sends_generate_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({
            "model": "mistral",
            "prompt": "Say hi",
            "stream": false,
            "temperature": 0.3,
            "system": "Be brief."
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"model":"mistral","response":"Hi!","done":true}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let reply = client
        .query(GenerateRequest::new("Say hi").system("Be brief.").temperature(0.3))
        .await;

    assert_eq!(reply, "Hi!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reasoning_flag_selects_reasoning_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::PartialJson(json!({"model": "deepseek-r1", "max_tokens": 64})))
        .with_status(200)
        .with_body(r#"{"response":"deep"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let reply = client
        .query(GenerateRequest::new("think").reasoning(true).max_tokens(64))
        .await;

    assert_eq!(reply, "deep");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_200_becomes_inline_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(500)
        .with_body("model not loaded")
        .create_async()
        .await;

    let client = client_for(&server.url());
    let reply = client.query(GenerateRequest::new("anything")).await;

    assert_eq!(reply, "Error: API returned status code 500");
}

#[tokio::test]
async fn test_unreachable_backend_becomes_inline_error() {
    // Port 9 (discard) is closed on test machines
    let client = client_for("http://127.0.0.1:9");
    let reply = client.query(GenerateRequest::new("anything")).await;

    assert!(reply.starts_with("Error: Failed to connect to LLM API"), "{reply}");
}

#[tokio::test]
async fn test_empty_prompt_skips_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server.url());
    assert_eq!(client.query(GenerateRequest::new("")).await, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fallback_report_carries_note() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(r#"{"response":"Zig is a systems language."}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let report = client.create_fallback_report("zig").await;

    assert!(report.starts_with("Zig is a systems language."));
    assert!(report.contains("**Note:** This report was generated with limited web research information"));
    assert!(report.contains("'zig'"));
}

#[tokio::test]
async fn test_report_prompt_lists_sources() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/generate")
        .match_body(Matcher::Regex(
            r"SOURCE 1: Garden soil\\nURL: https://soil.example/\\nSUMMARY: Loam drains well".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"response":"report"}"#)
        .create_async()
        .await;

    let client = client_for(&server.url());
    let report = client
        .create_research_report(
            "gardening",
            &[ArticleSummary {
                title: "Garden soil".into(),
                url: "https://soil.example/".into(),
                summary: "Loam drains well".into(),
            }],
        )
        .await;

    assert_eq!(report, "report");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_extract_trends_parses_json_reply() {
    let mut server = Server::new_async().await;
    let body = json!({
        "response": "Here you go:\n[{\"rank\": 1, \"title\": \"Eclipse\", \"volume\": \"2M+ searches\"}, {\"rank\": 2, \"title\": \"Playoffs\"}]"
    });
    server
        .mock("POST", "/api/generate")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = client_for(&server.url());
    let trends = client.extract_trends("page text").await;

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[0].title, "Eclipse");
    assert_eq!(trends[0].volume, "2M+ searches");
    assert_eq!(trends[1].volume, "Unknown");
}
