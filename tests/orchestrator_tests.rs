//! Browse-and-analyze loop end to end over a fake session

mod common;

use common::{FakeSession, article_html, create_test_html, search_results_html, test_config};
use deep_researcher::orchestrator::SEARCH_SCREENSHOT_FILE;
use deep_researcher::{BrowsePhase, BrowseRun, RunDirectory, SearchRequest, browse_and_analyze};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BUDGET: Duration = Duration::from_secs(30);

fn article_url(i: usize) -> String {
    format!("https://site{i}.example/article")
}

/// Search page with `count` results, each pointing at its own article page
fn session_with_results(count: usize) -> FakeSession {
    let urls: Vec<String> = (1..=count).map(article_url).collect();
    let titles: Vec<String> = (1..=count).map(|i| format!("Result headline {i}")).collect();
    let links: Vec<(&str, &str)> = urls
        .iter()
        .zip(&titles)
        .map(|(u, t)| (u.as_str(), t.as_str()))
        .collect();

    let mut session = FakeSession::new().with_search_page(search_results_html(&links));
    for (url, title) in urls.iter().zip(&titles) {
        session = session.with_page(url, article_html(title, 6));
    }
    session
}

#[tokio::test]
async fn test_failed_candidate_is_skipped_in_order() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = session_with_results(6).with_page(
        &article_url(2),
        create_test_html("Paywall", "<p>Subscribe to continue reading.</p>"),
    );

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("rust async", BUDGET),
        3,
        None,
    )
    .await;

    let urls: Vec<_> = articles.iter().map(|a| a.url.clone()).collect();
    assert_eq!(urls, [article_url(1), article_url(3), article_url(4)]);
    assert_eq!(articles[0].title, "Result headline 1");
    assert!(articles.iter().all(|a| a.content.chars().count() > 200));
    // Stops as soon as the target is met
    assert_eq!(session.visited().len(), 4);
}

#[tokio::test]
async fn test_erroring_second_of_four_candidates_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = session_with_results(4).panicking_on(&article_url(2));

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("rust async", BUDGET),
        3,
        None,
    )
    .await;

    let urls: Vec<_> = articles.iter().map(|a| a.url.clone()).collect();
    assert_eq!(urls, [article_url(1), article_url(3), article_url(4)]);
    assert_eq!(session.visited().len(), 4);
    assert_eq!(session.open_tabs(), 1);
}

#[tokio::test]
async fn test_slow_pages_cannot_outrun_the_budget() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let budget = Duration::from_secs(2);
    let mut session = session_with_results(3);
    for i in 1..=3 {
        session = session
            .with_page(&article_url(i), create_test_html("Thin", "<p>Short.</p>"))
            .slow_queries(&article_url(i), Duration::from_millis(500));
    }

    let start = Instant::now();
    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("slow", budget),
        3,
        None,
    )
    .await;
    let elapsed = start.elapsed();

    assert!(articles.is_empty());
    assert!(elapsed < budget + Duration::from_millis(500), "took {elapsed:?}");
    assert_eq!(session.open_tabs(), 1);
}

#[tokio::test]
async fn test_tab_count_returns_to_baseline() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = session_with_results(5)
        .failing_open(&article_url(1))
        .with_page(&article_url(3), create_test_html("Thin", "<p>Short.</p>"));

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::news("storm", BUDGET),
        2,
        None,
    )
    .await;

    let urls: Vec<_> = articles.iter().map(|a| a.url.clone()).collect();
    assert_eq!(urls, [article_url(2), article_url(4)]);
    assert_eq!(session.open_tabs(), 1);
    assert_eq!(session.max_open_tabs(), 2);
}

#[tokio::test]
async fn test_panicking_candidate_is_contained() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = session_with_results(3).panicking_on(&article_url(1));

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("crash", BUDGET),
        2,
        None,
    )
    .await;

    let urls: Vec<_> = articles.iter().map(|a| a.url.clone()).collect();
    assert_eq!(urls, [article_url(2), article_url(3)]);
    assert_eq!(session.open_tabs(), 1);
}

#[tokio::test]
async fn test_missing_results_container_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = FakeSession::new().with_search_page(create_test_html(
        "Blocked",
        r#"<a href="https://one.example/a">A perfectly good link</a>"#,
    ));

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("anything", Duration::from_secs(2)),
        3,
        None,
    )
    .await;

    assert!(articles.is_empty());
    assert!(session.visited().is_empty());
}

#[tokio::test]
async fn test_visits_are_capped_by_slack() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path())
        .into_builder()
        .candidate_slack(1)
        .build()
        .unwrap();
    let mut session = session_with_results(6);
    for i in 1..=6 {
        session = session.with_page(&article_url(i), create_test_html("Thin", "<p>Short.</p>"));
    }

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("thin", BUDGET),
        2,
        None,
    )
    .await;

    assert!(articles.is_empty());
    assert_eq!(session.visited().len(), 3);
}

#[tokio::test]
async fn test_artifacts_saved_to_run_directory() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let run_dir = RunDirectory::create(dir.path(), "research", "rust async")
        .await
        .unwrap();
    let session = session_with_results(2);

    let mut run = BrowseRun::new(&session, &config).save_to(&run_dir);
    let articles = run.run(&SearchRequest::web("rust async", BUDGET), 1).await;

    assert_eq!(articles.len(), 1);
    assert_eq!(run.phase(), BrowsePhase::Done);
    assert!(run_dir.join(SEARCH_SCREENSHOT_FILE).exists());
    assert!(run_dir.article_text_path(0, "Result headline 1").exists());
    assert!(run_dir.article_screenshot_path(0, "Result headline 1").exists());
    assert!(articles[0].screenshot.is_some());
    assert_eq!(session.screenshots_taken(), 2);
}

#[tokio::test]
async fn test_dead_session_browses_nothing() {
    let dir = TempDir::new().unwrap();
    let config = test_config(dir.path());
    let session = session_with_results(3);
    session.kill();

    let articles = browse_and_analyze(
        &session,
        &config,
        &SearchRequest::web("rust", BUDGET),
        3,
        None,
    )
    .await;

    assert!(articles.is_empty());
}
