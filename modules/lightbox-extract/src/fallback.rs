//! Composite DOM fallback: run all four scanners over one post container,
//! merge in fixed order, dedupe by URL.

use scraper::ElementRef;
use tracing::debug;

use lightbox_common::{LightboxConfig, MediaItem, ResolveSource, ResolvedMediaSet};

use crate::page::PageSnapshot;
use crate::scanners::{
    BackgroundImageScanner, DataAttributeScanner, DomScanner, ImageScanner, ScanOutcome,
    VideoScanner,
};

pub struct CompositeFallback {
    /// Fixed merge order: image, video, data-attribute, background-image.
    /// Background images go last so a URL also visible as a real `<img>` is
    /// attributed to the image scanner.
    scanners: Vec<Box<dyn DomScanner>>,
}

impl CompositeFallback {
    pub fn new(config: &LightboxConfig) -> Self {
        Self {
            scanners: vec![
                Box::new(ImageScanner::new()),
                Box::new(VideoScanner::new(config.include_videos)),
                Box::new(DataAttributeScanner::new(config.include_videos)),
                Box::new(BackgroundImageScanner::new()),
            ],
        }
    }

    /// Scan `container`, merge, and dedupe. `success` is simply "anything
    /// found"; an empty merge comes back as a failed set with
    /// `source = fallback` so the pipeline can classify it as terminal.
    pub fn extract(
        &self,
        page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ResolvedMediaSet {
        let mut merged: Vec<MediaItem> = Vec::new();
        let mut clicked_index: Option<usize> = None;

        for scanner in &self.scanners {
            let ScanOutcome { items, clicked_index: local } = scanner.scan(page, container, clicked);
            // First scanner to claim the click wins; later claims are noise
            // from overlapping evidence (e.g. a video's poster background).
            if clicked_index.is_none() {
                if let Some(local) = local {
                    clicked_index = Some(merged.len() + local);
                }
            }
            debug!(scanner = scanner.name(), found = items.len(), "fallback scan");
            merged.extend(items);
        }

        let (deduped, remapped_index) = dedupe_by_url(merged, clicked_index.unwrap_or(0));

        if deduped.is_empty() {
            return ResolvedMediaSet {
                success: false,
                items: Vec::new(),
                clicked_index: 0,
                source: ResolveSource::Fallback,
                metadata: Default::default(),
            };
        }
        ResolvedMediaSet::resolved(deduped, remapped_index, ResolveSource::Fallback)
    }
}

/// First occurrence of each URL wins; the clicked index follows its item's
/// URL to that first occurrence.
fn dedupe_by_url(items: Vec<MediaItem>, clicked_index: usize) -> (Vec<MediaItem>, usize) {
    let clicked_url = items.get(clicked_index).map(|item| item.url.clone());

    let mut kept: Vec<MediaItem> = Vec::with_capacity(items.len());
    for item in items {
        if !kept.iter().any(|k| k.url == item.url) {
            kept.push(item);
        }
    }

    let remapped = clicked_url
        .and_then(|url| kept.iter().position(|k| k.url == url))
        .unwrap_or(0);
    (kept, remapped)
}
