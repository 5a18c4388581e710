//! `<img>` element scanner.

use scraper::{ElementRef, Selector};

use lightbox_common::{MediaItem, MediaType};

use crate::media_url;
use crate::page::{self, PageSnapshot};
use crate::scanners::{DomScanner, ScanOutcome};

pub struct ImageScanner;

impl ImageScanner {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DomScanner for ImageScanner {
    fn name(&self) -> &'static str {
        "img-element"
    }

    fn scan(
        &self,
        _page: &PageSnapshot,
        container: ElementRef<'_>,
        clicked: ElementRef<'_>,
    ) -> ScanOutcome {
        let selector = Selector::parse("img").expect("valid selector");
        let mut outcome = ScanOutcome::default();

        for img in container.select(&selector) {
            let Some(src) = img.attr("src") else { continue };
            if !media_url::is_content_url(src) {
                continue;
            }

            if page::related(img, clicked) {
                outcome.clicked_index = Some(outcome.items.len());
            }

            // Keyed by kept position, so filtered elements leave no gaps.
            outcome.items.push(MediaItem {
                id: format!("img_{}", outcome.items.len()),
                url: media_url::upgrade_to_original(src),
                original_url: src.to_string(),
                media_type: MediaType::Image,
                thumbnail_url: Some(src.to_string()),
                alt_text: img.attr("alt").map(str::to_string),
                source_strategy: self.name().to_string(),
            });
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(markup: &str) -> PageSnapshot {
        PageSnapshot::parse(markup, None)
    }

    fn pick<'a>(page: &'a PageSnapshot, sel: &str) -> ElementRef<'a> {
        let selector = Selector::parse(sel).unwrap();
        page.document().select(&selector).next().unwrap()
    }

    #[test]
    fn avatars_are_filtered_and_order_preserved() {
        let page = setup(
            r#"<article>
                 <img src="https://pbs.twimg.com/profile_images/1/avatar.jpg">
                 <img id="first" src="https://cdn.example/media/a.jpg" alt="one">
                 <img src="https://cdn.example/media/b.jpg">
               </article>"#,
        );
        let container = pick(&page, "article");
        let clicked = pick(&page, "#first");

        let outcome = ImageScanner::new().scan(&page, container, clicked);
        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.items[0].url, "https://cdn.example/media/a.jpg");
        assert_eq!(outcome.items[0].alt_text.as_deref(), Some("one"));
        assert_eq!(outcome.clicked_index, Some(0));
    }

    #[test]
    fn ids_follow_kept_order_when_leading_elements_are_filtered() {
        let page = setup(
            r#"<article>
                 <img src="https://pbs.twimg.com/profile_images/1/avatar.jpg">
                 <img src="https://cdn.example/media/a.jpg">
                 <img src="https://cdn.example/media/b.jpg">
               </article>"#,
        );
        let container = pick(&page, "article");

        let outcome = ImageScanner::new().scan(&page, container, container);
        let ids: Vec<&str> = outcome.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["img_0", "img_1"]);
    }

    #[test]
    fn click_on_a_wrapper_matches_the_image_inside_it() {
        let page = setup(
            r#"<article><div><img src="https://cdn.example/media/c.jpg"></div></article>"#,
        );
        let container = pick(&page, "article");
        let clicked = pick(&page, "div");

        let outcome = ImageScanner::new().scan(&page, container, clicked);
        assert_eq!(outcome.clicked_index, Some(0));
    }

    #[test]
    fn cdn_urls_are_upgraded_to_originals() {
        let page = setup(
            r#"<article><img src="https://pbs.twimg.com/media/X?format=jpg&name=small"></article>"#,
        );
        let container = pick(&page, "article");
        let clicked = pick(&page, "img");

        let outcome = ImageScanner::new().scan(&page, container, clicked);
        assert_eq!(
            outcome.items[0].url,
            "https://pbs.twimg.com/media/X?format=jpg&name=orig"
        );
        assert_eq!(
            outcome.items[0].original_url,
            "https://pbs.twimg.com/media/X?format=jpg&name=small"
        );
    }
}
