//! First-non-null strategy chain with log-and-skip failure handling.

use std::panic::{self, AssertUnwindSafe};

use regex::Regex;
use scraper::ElementRef;
use tracing::{debug, warn};

use lightbox_common::{LightboxConfig, PostIdentity};

use crate::identity::{
    ancestor_data_attr::AncestorDataAttrStrategy, clicked_node::ClickedNodeStrategy,
    dom_structure::DomStructureStrategy, link_scan::LinkScanStrategy, page_url::PageUrlStrategy,
    IdentityStrategy,
};
use crate::page::PageSnapshot;

pub struct IdentityResolver {
    strategies: Vec<Box<dyn IdentityStrategy>>,
    valid_id: Regex,
}

impl IdentityResolver {
    /// The production chain: five strategies, priority ascending.
    pub fn new(config: &LightboxConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(ClickedNodeStrategy::new()),
            Box::new(PageUrlStrategy::new()),
            Box::new(DomStructureStrategy::new(config.max_ancestor_walk_depth)),
            Box::new(AncestorDataAttrStrategy::new()),
            Box::new(LinkScanStrategy::new(config.max_ancestor_walk_depth)),
        ])
    }

    /// Custom chain, re-sorted by priority. The combinator itself has no
    /// opinion about what the strategies do.
    pub fn with_strategies(mut strategies: Vec<Box<dyn IdentityStrategy>>) -> Self {
        strategies.sort_by_key(|s| s.priority());
        Self {
            strategies,
            valid_id: Regex::new(r"^\d+$").expect("valid regex"),
        }
    }

    /// First structurally valid identity in priority order, or `None`.
    /// A strategy that panics is logged and skipped; it never aborts the
    /// chain.
    pub fn resolve(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity> {
        for strategy in &self.strategies {
            match self.try_strategy(strategy.as_ref(), page, node) {
                Some(identity) => {
                    debug!(
                        strategy = strategy.name(),
                        post_id = identity.post_id.as_str(),
                        handle = identity.author_handle.as_str(),
                        confidence = identity.confidence,
                        "identity resolved"
                    );
                    return Some(identity);
                }
                None => continue,
            }
        }
        warn!("all identity strategies failed");
        None
    }

    /// Diagnostic sweep: every strategy's valid result, in priority order.
    /// Never used on the hot path; exists to compare strategies against the
    /// same node.
    pub fn resolve_all(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Vec<PostIdentity> {
        self.strategies
            .iter()
            .filter_map(|s| self.try_strategy(s.as_ref(), page, node))
            .collect()
    }

    fn try_strategy(
        &self,
        strategy: &dyn IdentityStrategy,
        page: &PageSnapshot,
        node: ElementRef<'_>,
    ) -> Option<PostIdentity> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.extract(page, node)));
        match outcome {
            Ok(Some(identity)) if self.is_valid(&identity) => Some(identity),
            Ok(Some(identity)) => {
                debug!(
                    strategy = strategy.name(),
                    post_id = identity.post_id.as_str(),
                    "strategy result rejected by validation"
                );
                None
            }
            Ok(None) => None,
            Err(_) => {
                warn!(strategy = strategy.name(), "identity strategy panicked, skipping");
                None
            }
        }
    }

    fn is_valid(&self, identity: &PostIdentity) -> bool {
        !identity.post_id.is_empty()
            && identity.post_id != PostIdentity::UNKNOWN_HANDLE
            && self.valid_id.is_match(&identity.post_id)
    }
}
