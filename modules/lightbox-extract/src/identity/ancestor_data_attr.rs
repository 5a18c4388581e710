//! Ancestor data-attribute walk. Same evidence class as the clicked-node
//! strategy but farther from the click, so it ranks and scores lower.

use scraper::ElementRef;

use lightbox_common::PostIdentity;

use crate::identity::{build_identity, id_from_attributes, IdentityStrategy};
use crate::page::{self, PageSnapshot};

/// Levels above the click worth checking for identity attributes.
const WALK_DEPTH: u32 = 5;

pub struct AncestorDataAttrStrategy;

impl AncestorDataAttrStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AncestorDataAttrStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStrategy for AncestorDataAttrStrategy {
    fn name(&self) -> &'static str {
        "ancestor_data_attr"
    }

    fn priority(&self) -> u32 {
        4
    }

    fn extract(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity> {
        for (depth, el) in std::iter::once(node)
            .chain(page::ancestors(node))
            .enumerate()
            .take(WALK_DEPTH as usize + 1)
        {
            if let Some(id) = id_from_attributes(el) {
                return Some(build_identity(page, node, id, self.name(), 0.6, depth as u32));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn clicked<'a>(page: &'a PageSnapshot, sel: &str) -> ElementRef<'a> {
        let selector = Selector::parse(sel).unwrap();
        page.document().select(&selector).next().unwrap()
    }

    #[test]
    fn id_two_levels_up_is_found_with_depth() {
        let page = PageSnapshot::parse(
            r#"<div data-item-id="4242"><div><img src="x.jpg"></div></div>"#,
            None,
        );
        let identity = AncestorDataAttrStrategy::new()
            .extract(&page, clicked(&page, "img"))
            .unwrap();
        assert_eq!(identity.post_id, "4242");
        assert_eq!(identity.discovered_at_depth, 2);
        assert_eq!(identity.confidence, 0.6);
    }

    #[test]
    fn walk_stops_at_the_depth_bound() {
        // Id sits 6 levels up; the walk gives up at 5.
        let page = PageSnapshot::parse(
            r#"<div data-tweet-id="9"><i><i><i><i><i><img></i></i></i></i></i></div>"#,
            None,
        );
        assert!(AncestorDataAttrStrategy::new()
            .extract(&page, clicked(&page, "img"))
            .is_none());
    }
}
