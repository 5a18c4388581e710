//! Identity from the browser's current address. On a post detail page the
//! URL already names the post, regardless of what was clicked.

use scraper::ElementRef;

use lightbox_common::PostIdentity;

use crate::identity::{post_url_for, status_id_in, IdentityStrategy};
use crate::page::PageSnapshot;

pub struct PageUrlStrategy;

impl PageUrlStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PageUrlStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStrategy for PageUrlStrategy {
    fn name(&self) -> &'static str {
        "page_url"
    }

    fn priority(&self) -> u32 {
        2
    }

    fn extract(&self, page: &PageSnapshot, _node: ElementRef<'_>) -> Option<PostIdentity> {
        let url = page.page_url()?;
        let post_id = status_id_in(url.path())?;
        let handle = page
            .page_handle()
            .unwrap_or_else(|| PostIdentity::UNKNOWN_HANDLE.to_string());
        Some(PostIdentity {
            post_url: post_url_for(&handle, &post_id),
            post_id,
            author_handle: handle,
            extraction_method: self.name().to_string(),
            confidence: 0.85,
            discovered_at_depth: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    #[test]
    fn detail_page_url_names_the_post() {
        let page = PageSnapshot::parse(
            "<article><img></article>",
            Some("https://x.com/carol/status/777/photo/2"),
        );
        let selector = Selector::parse("img").unwrap();
        let node = page.document().select(&selector).next().unwrap();

        let identity = PageUrlStrategy::new().extract(&page, node).unwrap();
        assert_eq!(identity.post_id, "777");
        assert_eq!(identity.author_handle, "carol");
        assert_eq!(identity.post_url, "https://x.com/carol/status/777");
    }

    #[test]
    fn timeline_url_does_not_match() {
        let page = PageSnapshot::parse("<article><img></article>", Some("https://x.com/home"));
        let selector = Selector::parse("img").unwrap();
        let node = page.document().select(&selector).next().unwrap();
        assert!(PageUrlStrategy::new().extract(&page, node).is_none());
    }
}
