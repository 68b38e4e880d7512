//! Tests for the configuration builder, JSON loading and validation

use deep_researcher::{ResearchConfig, ResearchError};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_builder_defaults() {
    let config = ResearchConfig::builder().build().unwrap();

    assert_eq!(config.ollama_url(), "http://localhost:11434");
    assert_eq!(config.ollama_model(), "mistral");
    assert_eq!(config.reasoning_model(), "deepseek-r1");
    assert_eq!(config.output_dir(), &PathBuf::from("output"));
    assert_eq!(config.acceptance_threshold(), 200);
    assert_eq!(config.candidate_slack(), 3);
    assert_eq!(config.search_engine_host(), "duckduckgo.com");
    assert!(config.blocked_sites().iter().any(|s| s == "medium.com"));
    assert!(config.capture_screenshots());
    assert_eq!(config, ResearchConfig::default());
}

#[test]
fn test_builder_overrides() {
    let config = ResearchConfig::builder()
        .ollama_url("http://gpu-box:11434/")
        .ollama_model("llama3")
        .output_dir("/tmp/research")
        .headless(true)
        .acceptance_threshold(500)
        .candidate_slack(0)
        .blocked_sites(vec!["example.org".to_string()])
        .build()
        .unwrap();

    assert_eq!(config.ollama_url(), "http://gpu-box:11434");
    assert_eq!(config.ollama_model(), "llama3");
    assert_eq!(config.output_dir(), &PathBuf::from("/tmp/research"));
    assert!(config.headless());
    assert_eq!(config.acceptance_threshold(), 500);
    assert_eq!(config.candidate_slack(), 0);
    assert_eq!(config.blocked_sites(), ["example.org".to_string()]);
}

#[test]
fn test_without_settle_delays_zeroes_every_delay() {
    let config = ResearchConfig::builder()
        .without_settle_delays()
        .build()
        .unwrap();

    assert_eq!(config.navigation_settle_cap(), Duration::ZERO);
    assert_eq!(config.search_settle_cap(), Duration::ZERO);
    assert_eq!(config.visit_settle(), Duration::ZERO);
    assert_eq!(config.tab_settle(), Duration::ZERO);
}

#[test]
fn test_zero_timeouts_are_rejected() {
    let err = ResearchConfig::builder()
        .page_load_timeout_secs(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ResearchError::Config(_)));

    let err = ResearchConfig::builder()
        .llm_timeout_secs(0)
        .build()
        .unwrap_err();
    assert!(matches!(err, ResearchError::Config(_)));
}

#[test]
fn test_invalid_search_engine_is_rejected() {
    let err = ResearchConfig::builder()
        .search_engine_url("not a url")
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Invalid search engine URL"));
}

#[test]
fn test_json_file_fills_missing_fields_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"ollama_model": "qwen2", "output_dir": "reports", "acceptance_threshold": 300}"#,
    )
    .unwrap();

    let config = ResearchConfig::from_json_file(&path).unwrap();

    assert_eq!(config.ollama_model(), "qwen2");
    assert_eq!(config.output_dir(), &PathBuf::from("reports"));
    assert_eq!(config.acceptance_threshold(), 300);
    assert_eq!(config.reasoning_model(), "deepseek-r1");
    assert_eq!(config.page_load_timeout(), Duration::from_secs(30));
}

#[test]
fn test_json_file_errors() {
    let dir = TempDir::new().unwrap();

    let missing = ResearchConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, ResearchError::Io(_)));

    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    let broken = ResearchConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(broken, ResearchError::Json(_)));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ResearchConfig::builder()
        .reasoning_model("qwq")
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let restored: ResearchConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}

#[test]
fn test_into_builder_keeps_existing_values() {
    let base = ResearchConfig::builder()
        .ollama_model("llama3")
        .build()
        .unwrap();
    let config = base.into_builder().headless(true).build().unwrap();

    assert_eq!(config.ollama_model(), "llama3");
    assert!(config.headless());
}
