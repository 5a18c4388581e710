//! Last-resort strategy: widen the search one ancestor level at a time and
//! scan each subtree for a `/status/` link. Catches markup the structural
//! heuristics don't know, at the cost of scanning the most nodes.

use scraper::{ElementRef, Selector};

use lightbox_common::PostIdentity;

use crate::identity::{build_identity, status_id_in, IdentityStrategy};
use crate::page::{self, PageSnapshot};

pub struct LinkScanStrategy {
    max_depth: u32,
}

impl LinkScanStrategy {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl IdentityStrategy for LinkScanStrategy {
    fn name(&self) -> &'static str {
        "link_scan"
    }

    fn priority(&self) -> u32 {
        5
    }

    fn extract(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity> {
        let status_link = Selector::parse(r#"a[href*="/status/"]"#).expect("valid selector");
        for (depth, el) in std::iter::once(node)
            .chain(page::ancestors(node))
            .enumerate()
            .take(self.max_depth as usize + 1)
        {
            for link in el.select(&status_link) {
                if let Some(id) = link.attr("href").and_then(status_id_in) {
                    return Some(build_identity(page, node, id, self.name(), 0.5, depth as u32));
                }
            }
        }
        None
    }
}
