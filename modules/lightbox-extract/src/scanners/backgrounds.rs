//! Inline background-image scanner.
//!
//! Walks every descendant and reads `background-image` out of the inline
//! `style` attribute. The most expensive and most false-positive-prone of
//! the four scanners (decorative backgrounds qualify), which is why the
//! composite merges it last.

use scraper::ElementRef;

use lightbox_common::{MediaItem, MediaType};

use crate::media_url;
use crate::page::{self, PageSnapshot};
use crate::scanners::{DomScanner, ScanOutcome};

pub struct BackgroundImageScanner;

impl BackgroundImageScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BackgroundImageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DomScanner for BackgroundImageScanner {
    fn name(&self) -> &'static str {
        "background-image"
    }

    fn scan(
        &self,
        _page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        // descendants() yields the container itself first; scan strictly below it.
        let elements = container.descendants().skip(1).filter_map(ElementRef::wrap);
        for el in elements {
            let Some(style) = el.attr("style") else { continue };
            let Some(url) = media_url::background_image_url(style) else {
                continue;
            };
            if !media_url::is_content_url(&url) {
                continue;
            }

            if page::related(el, clicked) {
                outcome.clicked_index = Some(outcome.items.len());
            }

            outcome.items.push(MediaItem {
                id: format!("bg_{}", outcome.items.len()),
                url: media_url::upgrade_to_original(&url),
                original_url: url,
                media_type: MediaType::Image,
                thumbnail_url: None,
                alt_text: None,
                source_strategy: self.name().to_string(),
            });
        }

        outcome
    }
}
