//! Extraction workflow against a scripted browser engine

mod common;

use anyhow::Result;
use common::{FakeEngine, FakePage};
use kodegen_tools_pagetext::{
    ErrorKind, ExtractOptions, Extractor, PageTextError, WaitUntil,
};
use std::sync::Arc;
use std::time::Duration;

const URL: &str = "https://example.com/story";

fn fast_page_options() -> ExtractOptions {
    ExtractOptions::page(Duration::from_secs(5), Duration::ZERO)
}

#[tokio::test]
async fn test_extract_reads_title_and_trimmed_body() -> Result<()> {
    let engine = Arc::new(
        FakeEngine::new().with_page(URL, FakePage::new("  Story  ", "\n  Body text here.  \n")),
    );
    let extractor = Extractor::new(Arc::clone(&engine));

    let result = extractor.extract(URL, &fast_page_options()).await?;

    assert_eq!(result.source_url, URL);
    assert_eq!(result.title, "Story");
    assert_eq!(result.content, "Body text here.");

    let log = engine.log();
    assert_eq!(log.sessions_opened, 1);
    assert_eq!(log.closes, 1);
    assert_eq!(
        log.navigations,
        vec![(URL.to_string(), WaitUntil::DomContentLoaded)]
    );
    Ok(())
}

#[tokio::test]
async fn test_fallback_to_load_after_dom_content_loaded_failure() -> Result<()> {
    let engine = Arc::new(FakeEngine::new().with_page(
        URL,
        FakePage::new("Slow", "Eventually loaded").failing_dom_content_loaded(),
    ));
    let extractor = Extractor::new(Arc::clone(&engine));

    let result = extractor.extract(URL, &fast_page_options()).await?;
    assert_eq!(result.content, "Eventually loaded");

    let log = engine.log();
    assert_eq!(
        log.navigations,
        vec![
            (URL.to_string(), WaitUntil::DomContentLoaded),
            (URL.to_string(), WaitUntil::Load),
        ]
    );
    assert_eq!(log.closes, 1);
    Ok(())
}

#[tokio::test]
async fn test_both_navigation_strategies_failing_is_navigation_error() -> Result<()> {
    let engine = Arc::new(FakeEngine::new().with_page(
        URL,
        FakePage::new("Never", "Never")
            .failing_dom_content_loaded()
            .failing_load(),
    ));
    let extractor = Extractor::new(Arc::clone(&engine));

    let err = match extractor.extract(URL, &fast_page_options()).await {
        Ok(result) => anyhow::bail!("expected navigation failure, got {result:?}"),
        Err(err) => err,
    };

    match &err {
        PageTextError::Navigation {
            url,
            primary,
            fallback,
        } => {
            assert_eq!(url, URL);
            assert!(primary.contains("domcontentloaded"), "primary: {primary}");
            assert!(fallback.contains("load"), "fallback: {fallback}");
        }
        other => anyhow::bail!("unexpected error: {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert!(err.is_transient());

    let log = engine.log();
    assert_eq!(log.navigations.len(), 2);
    assert_eq!(log.closes, 1);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_url_is_navigation_error() -> Result<()> {
    let engine = Arc::new(FakeEngine::new());
    let extractor = Extractor::new(Arc::clone(&engine));

    let result = extractor
        .extract("https://unreachable.invalid", &fast_page_options())
        .await;
    assert!(matches!(result, Err(PageTextError::Navigation { .. })));
    assert_eq!(engine.log().closes, 1);
    Ok(())
}

#[tokio::test]
async fn test_read_failure_is_extraction_error_and_releases_session() -> Result<()> {
    let engine = Arc::new(
        FakeEngine::new().with_page(URL, FakePage::new("Broken", "Broken").failing_read()),
    );
    let extractor = Extractor::new(Arc::clone(&engine));

    let result = extractor.extract(URL, &fast_page_options()).await;
    assert!(
        matches!(&result, Err(PageTextError::Extraction { url, .. }) if url == URL),
        "got {result:?}"
    );

    let log = engine.log();
    assert_eq!(log.sessions_opened, 1);
    assert_eq!(log.closes, 1);
    Ok(())
}

#[tokio::test]
async fn test_session_failure_is_session_error() -> Result<()> {
    let engine = Arc::new(FakeEngine::new().failing_sessions());
    let extractor = Extractor::new(Arc::clone(&engine));

    let result = extractor.extract(URL, &fast_page_options()).await;
    assert!(matches!(result, Err(PageTextError::Session(_))));

    let log = engine.log();
    assert!(log.navigations.is_empty());
    assert_eq!(log.closes, 0);
    Ok(())
}

#[tokio::test]
async fn test_user_agent_reaches_engine() -> Result<()> {
    let engine = Arc::new(FakeEngine::new().with_page(URL, FakePage::new("T", "B")));

    Extractor::new(Arc::clone(&engine))
        .extract(URL, &fast_page_options())
        .await?;
    Extractor::new(Arc::clone(&engine))
        .with_user_agent("pagetext-test/1.0")
        .extract(URL, &fast_page_options())
        .await?;

    let log = engine.log();
    assert!(log.user_agents[0].contains("Chrome/"));
    assert_eq!(log.user_agents[1], "pagetext-test/1.0");
    Ok(())
}

#[tokio::test]
async fn test_paragraph_reader_joins_with_blank_lines() -> Result<()> {
    let engine = Arc::new(FakeEngine::new().with_page(
        URL,
        FakePage::article("Article", &["First.", "  ", "Second.", "Third."]),
    ));
    let extractor = Extractor::new(Arc::clone(&engine));
    let options = ExtractOptions::article(Duration::from_secs(5), Duration::ZERO, ".article__body p");

    let result = extractor.extract(URL, &options).await?;
    assert_eq!(result.title, "Article");
    assert_eq!(result.content, "First.\n\nSecond.\n\nThird.");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_extractions_use_separate_sessions() -> Result<()> {
    let other = "https://example.com/other";
    let engine = Arc::new(
        FakeEngine::new()
            .with_page(URL, FakePage::new("One", "First page"))
            .with_page(other, FakePage::new("Two", "Second page")),
    );
    let extractor = Extractor::new(Arc::clone(&engine));
    let options = fast_page_options();

    let (a, b) = tokio::join!(
        extractor.extract(URL, &options),
        extractor.extract(other, &options)
    );
    assert_eq!(a?.content, "First page");
    assert_eq!(b?.content, "Second page");

    let log = engine.log();
    assert_eq!(log.sessions_opened, 2);
    assert_eq!(log.closes, 2);
    Ok(())
}
