//! Primary (authoritative) media resolution via the data-service client.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use lightbox_common::{LightboxError, MediaItem, PostIdentity, RawMediaEntry};

/// Client for the authoritative media service, keyed by post id. The real
/// implementation lives with the embedder; tests use the mock in
/// [`crate::testing`].
#[async_trait]
pub trait MediaProvider: Send + Sync {
    async fn media_for_post(&self, post_id: &str) -> Result<Vec<RawMediaEntry>>;
}

/// Media items plus which one corresponds to the click.
#[derive(Debug, Clone)]
pub struct PrimaryMedia {
    pub items: Vec<MediaItem>,
    pub clicked_index: usize,
}

pub struct PrimaryResolver {
    provider: Arc<dyn MediaProvider>,
    timeout: Duration,
}

impl PrimaryResolver {
    pub fn new(provider: Arc<dyn MediaProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// One bounded attempt against the service. Timeout, transport error,
    /// and an empty result all come back as the recoverable
    /// [`LightboxError::PrimaryServiceFailure`]; the caller moves on to the
    /// DOM fallback. Never panics, never propagates a provider error.
    ///
    /// `clicked_urls` are URLs captured synchronously from the clicked node
    /// before this suspension point; they pin the clicked index even if the
    /// DOM is replaced while the call is in flight.
    pub async fn resolve(
        &self,
        identity: &PostIdentity,
        clicked_urls: &[String],
    ) -> Result<PrimaryMedia, LightboxError> {
        let call = self.provider.media_for_post(&identity.post_id);
        let entries = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(entries)) => entries,
            Ok(Err(err)) => {
                warn!(post_id = identity.post_id.as_str(), error = %err, "primary service error");
                return Err(LightboxError::PrimaryServiceFailure(err.to_string()));
            }
            Err(_) => {
                warn!(
                    post_id = identity.post_id.as_str(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "primary service timed out"
                );
                return Err(LightboxError::PrimaryServiceFailure(format!(
                    "timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
        };

        if entries.is_empty() {
            return Err(LightboxError::PrimaryServiceFailure(
                "service returned no media".to_string(),
            ));
        }

        let mut entries = entries;
        entries.sort_by_key(|e| e.index);

        let items: Vec<MediaItem> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| MediaItem {
                id: format!("primary_{i}"),
                url: entry.download_url.clone(),
                original_url: entry.download_url.clone(),
                media_type: entry.media_type,
                thumbnail_url: entry.preview_url.clone(),
                alt_text: None,
                source_strategy: "primary".to_string(),
            })
            .collect();

        let clicked_index = entries
            .iter()
            .position(|entry| {
                clicked_urls.iter().any(|u| {
                    entry.download_url.contains(u.as_str())
                        || entry
                            .preview_url
                            .as_deref()
                            .is_some_and(|p| p.contains(u.as_str()) || u.contains(p))
                })
            })
            .unwrap_or(0);

        debug!(
            post_id = identity.post_id.as_str(),
            items = items.len(),
            clicked_index,
            "primary resolution succeeded"
        );
        Ok(PrimaryMedia { items, clicked_index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;
    use lightbox_common::MediaType;

    fn identity(id: &str) -> PostIdentity {
        PostIdentity {
            post_id: id.to_string(),
            author_handle: "tester".to_string(),
            post_url: format!("https://x.com/tester/status/{id}"),
            extraction_method: "clicked_node".to_string(),
            confidence: 0.9,
            discovered_at_depth: 0,
        }
    }

    fn entry(url: &str, index: u32) -> RawMediaEntry {
        RawMediaEntry {
            media_type: MediaType::Image,
            download_url: url.to_string(),
            preview_url: Some(format!("{url}?name=small")),
            index,
        }
    }

    #[tokio::test]
    async fn entries_come_back_ordered_by_index() {
        let provider = MockProvider::new().on_post(
            "42",
            vec![
                entry("https://cdn.example/c.jpg", 2),
                entry("https://cdn.example/a.jpg", 0),
                entry("https://cdn.example/b.jpg", 1),
            ],
        );
        let resolver = PrimaryResolver::new(Arc::new(provider), Duration::from_millis(100));

        let media = resolver.resolve(&identity("42"), &[]).await.unwrap();
        assert_eq!(media.items[0].url, "https://cdn.example/a.jpg");
        assert_eq!(media.items[2].url, "https://cdn.example/c.jpg");
        assert_eq!(media.clicked_index, 0);
    }

    #[tokio::test]
    async fn clicked_url_pins_the_index() {
        let provider = MockProvider::new().on_post(
            "42",
            vec![
                entry("https://cdn.example/a.jpg", 0),
                entry("https://cdn.example/b.jpg", 1),
            ],
        );
        let resolver = PrimaryResolver::new(Arc::new(provider), Duration::from_millis(100));

        let clicked = vec!["https://cdn.example/b.jpg".to_string()];
        let media = resolver.resolve(&identity("42"), &clicked).await.unwrap();
        assert_eq!(media.clicked_index, 1);
    }

    #[tokio::test]
    async fn empty_result_is_a_recoverable_failure() {
        let provider = MockProvider::new().on_post("42", vec![]);
        let resolver = PrimaryResolver::new(Arc::new(provider), Duration::from_millis(100));

        let err = resolver.resolve(&identity("42"), &[]).await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn timeout_is_a_recoverable_failure() {
        let provider = MockProvider::new()
            .on_post("42", vec![entry("https://cdn.example/a.jpg", 0)])
            .with_delay(Duration::from_millis(80));
        let resolver = PrimaryResolver::new(Arc::new(provider), Duration::from_millis(20));

        let err = resolver.resolve(&identity("42"), &[]).await.unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn unknown_post_is_a_recoverable_failure() {
        let provider = MockProvider::new();
        let resolver = PrimaryResolver::new(Arc::new(provider), Duration::from_millis(100));
        let err = resolver.resolve(&identity("7"), &[]).await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
