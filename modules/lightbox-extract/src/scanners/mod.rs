//! Fallback-path DOM scanners.
//!
//! Each scanner reads one evidence class out of a post container's subtree:
//! `<img>` elements, `<video>` elements, deferred-load data attributes, and
//! inline background images. They are independent and order-agnostic; the
//! composite in [`crate::fallback`] fixes their merge order.

pub mod backgrounds;
pub mod data_attrs;
pub mod images;
pub mod videos;

use scraper::ElementRef;

use lightbox_common::MediaItem;

use crate::page::PageSnapshot;

pub use backgrounds::BackgroundImageScanner;
pub use data_attrs::DataAttributeScanner;
pub use images::ImageScanner;
pub use videos::VideoScanner;

/// Items found by one scanner, in document order, plus the position of the
/// item matching the clicked node (by three-way containment) if any.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub items: Vec<MediaItem>,
    pub clicked_index: Option<usize>,
}

pub trait DomScanner: Send + Sync {
    fn name(&self) -> &'static str;
    fn scan(
        &self,
        page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ScanOutcome;
}
