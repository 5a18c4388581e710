//! Highest-trust strategy: the clicked element itself.
//!
//! Tries, in order: id-bearing data attributes on the node, the
//! `aria-labelledby` cross-reference pattern, then a `/status/` href on the
//! node or its nearest enclosing anchor.

use scraper::ElementRef;

use lightbox_common::PostIdentity;

use crate::identity::{
    build_identity, id_from_aria_labelledby, id_from_attributes, status_id_in, IdentityStrategy,
};
use crate::page::{self, PageSnapshot};

/// How far above the click a wrapping anchor may sit and still count as
/// "the clicked element's link".
const ANCHOR_WALK_DEPTH: u32 = 3;

pub struct ClickedNodeStrategy;

impl ClickedNodeStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClickedNodeStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStrategy for ClickedNodeStrategy {
    fn name(&self) -> &'static str {
        "clicked_node"
    }

    fn priority(&self) -> u32 {
        1
    }

    fn extract(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity> {
        if let Some(id) = id_from_attributes(node) {
            return Some(build_identity(page, node, id, self.name(), 0.9, 0));
        }

        if let Some(labelled_by) = node.attr("aria-labelledby") {
            if let Some(id) = id_from_aria_labelledby(labelled_by) {
                return Some(build_identity(page, node, id, self.name(), 0.9, 0));
            }
        }

        let anchor = page::closest(node, ANCHOR_WALK_DEPTH, |el| el.value().name() == "a");
        if let Some((anchor, depth)) = anchor {
            if let Some(id) = anchor.attr("href").and_then(status_id_in) {
                return Some(build_identity(page, node, id, self.name(), 0.9, depth));
            }
        }

        // The node may itself carry an href without being an <a>.
        if let Some(id) = node.attr("href").and_then(|h| status_id_in(h)) {
            return Some(build_identity(page, node, id, self.name(), 0.9, 0));
        }

        None
    }
}
