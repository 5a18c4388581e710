//! Pipeline orchestration: identity → primary → fallback, with one
//! normalized result per click and no path that throws past this boundary.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::FutureExt;
use ego_tree::NodeId;
use scraper::ElementRef;
use tracing::{debug, info, warn};
use uuid::Uuid;

use lightbox_common::{
    LightboxConfig, LightboxError, ResolveSource, ResolvedMediaSet,
};

use crate::fallback::CompositeFallback;
use crate::identity::IdentityResolver;
use crate::page::{self, PageSnapshot};
use crate::primary::{MediaProvider, PrimaryResolver};

/// Running diagnostics. Read by dashboards and tests, never consulted by
/// resolution logic — there is deliberately no circuit breaker and no
/// backoff keyed on failure history.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub total_attempts: u64,
    pub successful_attempts: u64,
    /// Simple moving average over all attempts.
    pub avg_duration_ms: f64,
}

pub struct ExtractionPipeline {
    identity: IdentityResolver,
    primary: PrimaryResolver,
    fallback: CompositeFallback,
    config: LightboxConfig,
    stats: Mutex<PipelineStats>,
}

impl ExtractionPipeline {
    pub fn new(provider: Arc<dyn MediaProvider>, config: LightboxConfig) -> Self {
        Self {
            identity: IdentityResolver::new(&config),
            primary: PrimaryResolver::new(
                provider,
                Duration::from_millis(config.primary_timeout_ms),
            ),
            fallback: CompositeFallback::new(&config),
            config,
            stats: Mutex::new(PipelineStats::default()),
        }
    }

    /// Sole public entry point: resolve the media set for one click.
    ///
    /// Always returns; identity misses and primary failures fall through to
    /// the DOM fallback, terminal failures come back as `success = false`,
    /// and a panicking sub-stage is absorbed into `source = error`.
    pub async fn extract_from_click(
        &self,
        page: &PageSnapshot,
        target: NodeId,
    ) -> ResolvedMediaSet {
        let resolution_id = Uuid::new_v4();
        let started = Instant::now();
        let mut chain: Vec<String> = Vec::new();

        debug!(%resolution_id, "resolution started");

        let Some(node) = page.element(target) else {
            warn!(%resolution_id, "click target is not an element in this snapshot");
            return self.finish(
                ResolvedMediaSet::error("click target is not an element"),
                chain,
                started,
                resolution_id,
            );
        };

        // Everything the primary path needs from the DOM is captured before
        // the first suspension point; the live page may mutate while the
        // service call is in flight.
        let clicked_urls = clicked_media_urls(node);

        let identity = self.identity.resolve(page, node);
        match &identity {
            Some(id) => chain.push(format!("identity:{}", id.extraction_method)),
            None => chain.push("identity:none".to_string()),
        }

        if let Some(identity) = &identity {
            chain.push("primary".to_string());
            let attempt = AssertUnwindSafe(self.primary.resolve(identity, &clicked_urls))
                .catch_unwind()
                .await;
            match attempt {
                Ok(Ok(media)) => {
                    let set = ResolvedMediaSet::resolved(
                        media.items,
                        media.clicked_index,
                        ResolveSource::Primary,
                    );
                    return self.finish(set, chain, started, resolution_id);
                }
                Ok(Err(err)) => {
                    debug!(%resolution_id, error = %err, "primary path failed, falling back");
                }
                Err(_) => {
                    warn!(%resolution_id, "primary resolver panicked");
                    return self.finish(
                        ResolvedMediaSet::error("primary resolver panicked"),
                        chain,
                        started,
                        resolution_id,
                    );
                }
            }
        }

        chain.push("fallback".to_string());
        let set = self.run_fallback(page, node, resolution_id);
        self.finish(set, chain, started, resolution_id)
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn run_fallback(
        &self,
        page: &PageSnapshot,
        node: ElementRef<'_>,
        resolution_id: Uuid,
    ) -> ResolvedMediaSet {
        let container = page::find_post_container(node, self.config.max_ancestor_walk_depth);
        let Some((container, depth)) = container else {
            debug!(%resolution_id, "no post container around click");
            return ResolvedMediaSet::empty(
                ResolveSource::None,
                LightboxError::FallbackContainerNotFound.to_string(),
            );
        };
        debug!(%resolution_id, container_depth = depth, "running DOM fallback");

        let scanned = panic::catch_unwind(AssertUnwindSafe(|| {
            self.fallback.extract(page, container, node)
        }));
        match scanned {
            Ok(set) if set.success => set,
            Ok(mut set) => {
                set.metadata.error = Some(LightboxError::FallbackEmpty.to_string());
                set
            }
            Err(_) => {
                warn!(%resolution_id, "fallback scanners panicked");
                ResolvedMediaSet::error("fallback scanners panicked")
            }
        }
    }

    fn finish(
        &self,
        mut set: ResolvedMediaSet,
        chain: Vec<String>,
        started: Instant,
        resolution_id: Uuid,
    ) -> ResolvedMediaSet {
        set.metadata.strategy_chain = chain;
        set.metadata.duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        if let Ok(mut stats) = self.stats.lock() {
            stats.total_attempts += 1;
            if set.success {
                stats.successful_attempts += 1;
            }
            let n = stats.total_attempts as f64;
            stats.avg_duration_ms += (set.metadata.duration_ms - stats.avg_duration_ms) / n;
        }

        info!(
            %resolution_id,
            success = set.success,
            source = %set.source,
            items = set.items.len(),
            duration_ms = set.metadata.duration_ms,
            "resolution finished"
        );
        set
    }
}

/// Media URLs visible on or directly around the clicked node, captured
/// synchronously. Used to pin the clicked index on the primary path.
fn clicked_media_urls(node: ElementRef<'_>) -> Vec<String> {
    let mut urls = Vec::new();
    let mut push = |value: Option<&str>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                urls.push(v.to_string());
            }
        }
    };

    push(node.attr("src"));
    push(node.attr("poster"));
    push(node.attr("data-src"));
    push(node.attr("data-url"));
    push(node.attr("data-background-image"));

    // A wrapper click: take the first media element inside it.
    if urls.is_empty() {
        for descendant in node.descendants().skip(1).filter_map(ElementRef::wrap) {
            let name = descendant.value().name();
            if name == "img" || name == "video" {
                if let Some(src) = descendant.attr("src").or_else(|| descendant.attr("poster")) {
                    if !src.trim().is_empty() {
                        urls.push(src.to_string());
                        break;
                    }
                }
            }
        }
    }

    urls
}
