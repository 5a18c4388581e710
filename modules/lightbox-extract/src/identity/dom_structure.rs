//! Structural heuristic: find the post container wrapping the click, then
//! read the `/status/` permalink inside it. Covers the common timeline case
//! where neither the clicked element nor the page URL names the post.

use scraper::{ElementRef, Selector};

use lightbox_common::PostIdentity;

use crate::identity::{build_identity, status_id_in, IdentityStrategy};
use crate::page::{self, PageSnapshot};

pub struct DomStructureStrategy {
    max_depth: u32,
}

impl DomStructureStrategy {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Permalink inside the container: any `/status/` anchor, else the
    /// timestamp pattern (a `<time>` wrapped by the permalink anchor).
    fn id_within(container: ElementRef<'_>) -> Option<String> {
        let status_link = Selector::parse(r#"a[href*="/status/"]"#).expect("valid selector");
        for link in container.select(&status_link) {
            if let Some(id) = link.attr("href").and_then(status_id_in) {
                return Some(id);
            }
        }

        let time = Selector::parse("time").expect("valid selector");
        for stamp in container.select(&time) {
            let anchor = page::closest(stamp, 3, |el| {
                el.value().name() == "a" && el.attr("href").is_some_and(|h| h.contains("/status/"))
            });
            if let Some((anchor, _)) = anchor {
                if let Some(id) = anchor.attr("href").and_then(status_id_in) {
                    return Some(id);
                }
            }
        }

        None
    }
}

impl IdentityStrategy for DomStructureStrategy {
    fn name(&self) -> &'static str {
        "dom_structure"
    }

    fn priority(&self) -> u32 {
        3
    }

    fn extract(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity> {
        let (container, depth) = page::find_post_container(node, self.max_depth)?;
        let id = Self::id_within(container)?;
        Some(build_identity(page, node, id, self.name(), 0.75, depth))
    }
}
