//! Chain tests — end-to-end through the pipeline with a mock provider.
//!
//! Each test follows MOCK → FUNCTION → OUTPUT: register the fake service,
//! parse a markup fixture, call `extract_from_click`, assert on the set.

use std::sync::Arc;
use std::time::Duration;

use lightbox_common::{LightboxConfig, MediaType, ResolveSource};

use crate::pipeline::ExtractionPipeline;
use crate::testing::*;
use crate::PageSnapshot;

fn pipeline(provider: MockProvider) -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(provider), LightboxConfig::default())
}

fn pipeline_with(provider: MockProvider, config: LightboxConfig) -> ExtractionPipeline {
    ExtractionPipeline::new(Arc::new(provider), config)
}

// ---------------------------------------------------------------------------
// Scenario: no identity anywhere, no service — pure DOM fallback.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_image_resolves_through_fallback() {
    let markup = anonymous_markup(r#"<img src="https://cdn.example/media/abc.jpg">"#);
    let page = PageSnapshot::parse(&markup, None);
    let provider = MockProvider::new();

    let set = pipeline(provider)
        .extract_from_click(&page, node_id(&page, "img"))
        .await;

    assert!(set.success);
    assert_eq!(set.source, ResolveSource::Fallback);
    assert_eq!(set.items.len(), 1);
    assert_eq!(set.items[0].url, "https://cdn.example/media/abc.jpg");
    assert_eq!(set.items[0].media_type, MediaType::Image);
    assert_eq!(set.clicked_index, 0);
    assert!(set
        .metadata
        .strategy_chain
        .contains(&"identity:none".to_string()));
}

// ---------------------------------------------------------------------------
// Scenario: clicked node carries the id, service answers.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn data_attribute_identity_takes_the_primary_path() {
    let page = PageSnapshot::parse(
        r#"<article><img data-tweet-id="42" src="https://cdn.example/thumb.jpg"></article>"#,
        None,
    );
    let provider = MockProvider::new().on_post(
        "42",
        vec![
            image_entry("https://cdn.example/full_a.jpg", 0),
            image_entry("https://cdn.example/full_b.jpg", 1),
            video_entry("https://v.example/c.mp4", "https://cdn.example/c_thumb.jpg", 2),
        ],
    );

    let set = pipeline(provider)
        .extract_from_click(&page, node_id(&page, "img"))
        .await;

    assert!(set.success);
    assert_eq!(set.source, ResolveSource::Primary);
    assert_eq!(set.items.len(), 3);
    assert_eq!(set.items[2].media_type, MediaType::Video);
    assert!(set
        .metadata
        .strategy_chain
        .contains(&"identity:clicked_node".to_string()));
    assert!(set.metadata.strategy_chain.contains(&"primary".to_string()));
}

// ---------------------------------------------------------------------------
// Scenario: service hangs past its budget — fall back, still answer.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn primary_timeout_falls_back_and_still_returns() {
    let markup = post_markup(
        "alice",
        "42",
        r#"<img src="https://cdn.example/media/a.jpg">"#,
    );
    let page = PageSnapshot::parse(&markup, None);
    let provider = MockProvider::new()
        .on_post("42", vec![image_entry("https://cdn.example/full.jpg", 0)])
        .with_delay(Duration::from_millis(80));

    let config = LightboxConfig {
        primary_timeout_ms: 30,
        ..LightboxConfig::default()
    };
    let set = pipeline_with(provider, config)
        .extract_from_click(&page, node_id(&page, "img"))
        .await;

    assert!(set.success);
    assert_eq!(set.source, ResolveSource::Fallback);
    assert!(set.metadata.duration_ms >= 30.0);
    assert!(set.metadata.strategy_chain.contains(&"primary".to_string()));
    assert!(set.metadata.strategy_chain.contains(&"fallback".to_string()));
}

#[tokio::test]
async fn primary_error_falls_back() {
    let markup = post_markup(
        "alice",
        "88",
        r#"<img src="https://cdn.example/media/x.jpg">"#,
    );
    let page = PageSnapshot::parse(&markup, None);
    let provider = MockProvider::new().with_error("upstream 503");

    let set = pipeline(provider)
        .extract_from_click(&page, node_id(&page, "img"))
        .await;

    assert!(set.success);
    assert_eq!(set.source, ResolveSource::Fallback);
}

// ---------------------------------------------------------------------------
// Scenario: lone video with poster.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lone_video_resolves_with_src_not_poster() {
    let markup = anonymous_markup(r#"<video poster="p.jpg" src="v.mp4"></video>"#);
    let page = PageSnapshot::parse(&markup, None);

    let set = pipeline(MockProvider::new())
        .extract_from_click(&page, node_id(&page, "video"))
        .await;

    assert!(set.success);
    assert_eq!(set.items.len(), 1);
    assert_eq!(set.items[0].media_type, MediaType::Video);
    assert_eq!(set.items[0].url, "v.mp4");
    assert_eq!(set.items[0].thumbnail_url.as_deref(), Some("p.jpg"));
}

// ---------------------------------------------------------------------------
// Terminal failures stay silent and structured.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_container_is_terminal_with_source_none() {
    let page = PageSnapshot::parse(r#"<div><span id="t">just text</span></div>"#, None);

    let set = pipeline(MockProvider::new())
        .extract_from_click(&page, node_id(&page, "#t"))
        .await;

    assert!(!set.success);
    assert_eq!(set.source, ResolveSource::None);
    assert!(set.items.is_empty());
    assert!(set.metadata.error.is_some());
}

#[tokio::test]
async fn empty_container_is_terminal_with_empty_fallback() {
    let page = PageSnapshot::parse(r#"<article><p id="t">words</p></article>"#, None);

    let set = pipeline(MockProvider::new())
        .extract_from_click(&page, node_id(&page, "#t"))
        .await;

    assert!(!set.success);
    assert!(set.items.is_empty());
    assert_eq!(set.source, ResolveSource::Fallback);
    assert!(set
        .metadata
        .error
        .as_deref()
        .is_some_and(|e| e.contains("no extractable media")));
}

// ---------------------------------------------------------------------------
// Result invariants and diagnostics.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_sets_keep_clicked_index_in_range() {
    let markup = anonymous_markup(
        r#"<img src="https://cdn.example/a.jpg">
           <img id="second" src="https://cdn.example/b.jpg">
           <img src="https://cdn.example/c.jpg">"#,
    );
    let page = PageSnapshot::parse(&markup, None);

    let set = pipeline(MockProvider::new())
        .extract_from_click(&page, node_id(&page, "#second"))
        .await;

    assert!(set.success);
    assert_eq!(set.clicked_index, 1);
    assert!(set.clicked_index < set.items.len());
}

#[tokio::test]
async fn stats_track_attempts_without_affecting_results() {
    let markup = anonymous_markup(r#"<img src="https://cdn.example/a.jpg">"#);
    let page = PageSnapshot::parse(&markup, None);
    let pipe = pipeline(MockProvider::new());

    let first = pipe.extract_from_click(&page, node_id(&page, "img")).await;
    let second = pipe.extract_from_click(&page, node_id(&page, "img")).await;
    assert_eq!(first.items, second.items);

    let stats = pipe.stats();
    assert_eq!(stats.total_attempts, 2);
    assert_eq!(stats.successful_attempts, 2);
    assert!(stats.avg_duration_ms >= 0.0);
}

#[tokio::test]
async fn primary_wins_when_identity_and_service_agree() {
    // Identity via the page URL even though the clicked node is bare.
    let page = PageSnapshot::parse(
        r#"<article><img src="https://cdn.example/media/t.jpg"></article>"#,
        Some("https://x.com/bob/status/1234567890"),
    );
    let provider = MockProvider::new().on_post(
        "1234567890",
        vec![image_entry("https://cdn.example/orig.jpg", 0)],
    );

    let set = pipeline(provider)
        .extract_from_click(&page, node_id(&page, "img"))
        .await;

    assert_eq!(set.source, ResolveSource::Primary);
    assert!(set
        .metadata
        .strategy_chain
        .contains(&"identity:page_url".to_string()));
}
