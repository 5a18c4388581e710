//! Test support: a mock media provider and page-fixture helpers.
//!
//! MOCK → FUNCTION → OUTPUT: tests set up the fake service and a markup
//! snapshot, call the actual pipeline, and assert on the returned set.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::Selector;

use lightbox_common::{MediaType, RawMediaEntry};

use crate::page::PageSnapshot;
use crate::primary::MediaProvider;

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// HashMap-based media provider. Returns `Err` for unregistered post ids.
/// Builder pattern: `.on_post()`, `.with_delay()`, `.with_error()`.
pub struct MockProvider {
    posts: HashMap<String, Vec<RawMediaEntry>>,
    delay: Option<Duration>,
    error: Option<String>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            delay: None,
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn on_post(mut self, post_id: &str, entries: Vec<RawMediaEntry>) -> Self {
        self.posts.insert(post_id.to_string(), entries);
        self
    }

    /// Sleep before answering; longer than the pipeline timeout simulates a
    /// hung service.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with this message.
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProvider for MockProvider {
    async fn media_for_post(&self, post_id: &str) -> Result<Vec<RawMediaEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.error {
            bail!("{message}");
        }
        match self.posts.get(post_id) {
            Some(entries) => Ok(entries.clone()),
            None => bail!("no media registered for post {post_id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Image entry as the authoritative service would return it.
pub fn image_entry(url: &str, index: u32) -> RawMediaEntry {
    RawMediaEntry {
        media_type: MediaType::Image,
        download_url: url.to_string(),
        preview_url: Some(format!("{url}?name=small")),
        index,
    }
}

pub fn video_entry(url: &str, preview: &str, index: u32) -> RawMediaEntry {
    RawMediaEntry {
        media_type: MediaType::Video,
        download_url: url.to_string(),
        preview_url: Some(preview.to_string()),
        index,
    }
}

/// Node id of the first element matching `selector`. Panics on a miss:
/// a broken fixture should fail loudly.
pub fn node_id(page: &PageSnapshot, selector: &str) -> NodeId {
    let parsed = Selector::parse(selector).expect("valid selector");
    page.document()
        .select(&parsed)
        .next()
        .unwrap_or_else(|| panic!("fixture has no element matching {selector}"))
        .id()
}

/// A post container with one `/status/` permalink and arbitrary media markup.
pub fn post_markup(handle: &str, post_id: &str, media: &str) -> String {
    format!(
        r#"<article data-testid="tweet">
             <div><a data-testid="User-Name" href="/{handle}">{handle}</a></div>
             <a href="/{handle}/status/{post_id}"><time datetime="2025-06-01">Jun 1</time></a>
             <div data-testid="tweetPhoto">{media}</div>
           </article>"#
    )
}

/// A bare container with media but no identity markers anywhere.
pub fn anonymous_markup(media: &str) -> String {
    format!(r#"<article><div>{media}</div></article>"#)
}
