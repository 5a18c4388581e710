//! `<video>` element scanner. Source attribute first, poster as the URL of
//! last resort (a poster-only video still deserves a viewer entry).

use scraper::{ElementRef, Selector};

use lightbox_common::{MediaItem, MediaType};

use crate::page::{self, PageSnapshot};
use crate::scanners::{DomScanner, ScanOutcome};

pub struct VideoScanner {
    include_videos: bool,
}

impl VideoScanner {
    pub fn new(include_videos: bool) -> Self {
        Self { include_videos }
    }
}

impl DomScanner for VideoScanner {
    fn name(&self) -> &'static str {
        "video-element"
    }

    fn scan(
        &self,
        _page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if !self.include_videos {
            return outcome;
        }

        let selector = Selector::parse("video").expect("valid selector");
        for video in container.select(&selector) {
            let poster = video.attr("poster").filter(|p| !p.trim().is_empty());
            let Some(src) = video
                .attr("src")
                .filter(|s| !s.trim().is_empty())
                .or(poster)
            else {
                continue;
            };

            if page::related(video, clicked) {
                outcome.clicked_index = Some(outcome.items.len());
            }

            outcome.items.push(MediaItem {
                id: format!("video_{}", outcome.items.len()),
                url: src.to_string(),
                original_url: src.to_string(),
                media_type: MediaType::Video,
                thumbnail_url: Some(poster.unwrap_or(src).to_string()),
                alt_text: None,
                source_strategy: self.name().to_string(),
            });
        }

        outcome
    }
}
