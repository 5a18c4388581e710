//! Deferred-load attribute scanner. Lazy-loaded media leaves its URL in
//! `data-src` / `data-background-image` / `data-url` long before the real
//! element exists, so this catches items the img/video scanners can't see.

use scraper::{ElementRef, Selector};

use lightbox_common::{MediaItem, MediaType};

use crate::media_url;
use crate::page::{self, PageSnapshot};
use crate::scanners::{DomScanner, ScanOutcome};

/// Per-element attribute precedence.
const DEFERRED_ATTRIBUTES: &[&str] = &["data-src", "data-background-image", "data-url"];

pub struct DataAttributeScanner {
    include_videos: bool,
}

impl DataAttributeScanner {
    pub fn new(include_videos: bool) -> Self {
        Self { include_videos }
    }
}

impl DomScanner for DataAttributeScanner {
    fn name(&self) -> &'static str {
        "data-attribute"
    }

    fn scan(
        &self,
        _page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ScanOutcome {
        let selector = Selector::parse("[data-src], [data-background-image], [data-url]")
            .expect("valid selector");
        let mut outcome = ScanOutcome::default();

        for el in container.select(&selector) {
            let Some(url) = DEFERRED_ATTRIBUTES.iter().find_map(|a| el.attr(a)) else {
                continue;
            };
            if !media_url::is_content_url(url) {
                continue;
            }

            let media_type = media_url::infer_media_type(url);
            if media_type == MediaType::Video && !self.include_videos {
                continue;
            }

            if page::related(el, clicked) {
                outcome.clicked_index = Some(outcome.items.len());
            }

            let display_url = match media_type {
                MediaType::Image => media_url::upgrade_to_original(url),
                MediaType::Video => url.to_string(),
            };
            outcome.items.push(MediaItem {
                id: format!("data_{}", outcome.items.len()),
                url: display_url,
                original_url: url.to_string(),
                media_type,
                thumbnail_url: None,
                alt_text: None,
                source_strategy: self.name().to_string(),
            });
        }

        outcome
    }
}
