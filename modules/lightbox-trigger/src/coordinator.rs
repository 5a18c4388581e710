//! Click coordination: one document-level gate in front of the pipeline.
//!
//! Listener registration stays at the document level in the embedder —
//! element-level listeners would not survive the host page's constant DOM
//! replacement. The embedder forwards every captured click here as a
//! [`ClickEvent`]; the decision says whether to swallow the click's default
//! action and what, if anything, was resolved.

use std::sync::{Arc, Mutex};

use ego_tree::NodeId;
use scraper::{ElementRef, Selector};
use tracing::debug;

use lightbox_common::{LightboxConfig, ResolvedMediaSet};
use lightbox_extract::page::{self, PageSnapshot};
use lightbox_extract::ExtractionPipeline;

use crate::debounce::DebounceGate;
use crate::traits::{GalleryPresenter, VideoSuppressor};

/// How far above a click a control button or media container may sit.
const CONTROL_WALK_DEPTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub target: NodeId,
    pub button: MouseButton,
    /// Event timestamp, used by the debounce gate instead of wall clock so
    /// replayed event streams stay deterministic.
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NonPrimaryButton,
    ViewerOpen,
    Debounced,
    ControlButton,
    NoMediaContext,
    TargetNotFound,
}

#[derive(Debug)]
pub enum ClickOutcome {
    /// The pipeline ran; the set says whether it found anything.
    Resolved(ResolvedMediaSet),
    /// The click closed the open viewer instead of starting a resolution.
    ViewerClosed,
    Rejected(RejectReason),
}

#[derive(Debug)]
pub struct ClickDecision {
    /// When true the embedder must call preventDefault/stopPropagation on
    /// the originating event.
    pub suppress_default: bool,
    pub outcome: ClickOutcome,
}

impl ClickDecision {
    fn reject(reason: RejectReason) -> Self {
        Self {
            suppress_default: false,
            outcome: ClickOutcome::Rejected(reason),
        }
    }
}

pub struct ClickCoordinator {
    pipeline: ExtractionPipeline,
    gate: Mutex<DebounceGate>,
    suppressor: Arc<dyn VideoSuppressor>,
    presenter: Arc<dyn GalleryPresenter>,
    max_walk_depth: u32,
}

impl ClickCoordinator {
    pub fn new(
        pipeline: ExtractionPipeline,
        suppressor: Arc<dyn VideoSuppressor>,
        presenter: Arc<dyn GalleryPresenter>,
        config: &LightboxConfig,
    ) -> Self {
        Self {
            pipeline,
            gate: Mutex::new(DebounceGate::new(config.debounce_window_ms)),
            suppressor,
            presenter,
            max_walk_depth: config.max_ancestor_walk_depth,
        }
    }

    /// Run the filter chain and, for qualifying clicks, one resolution.
    ///
    /// Ambient playback pauses as soon as the click qualifies — before
    /// extraction finishes — and is restored if the resolution comes back
    /// empty. Overlapping in-flight resolutions are possible when the
    /// debounce window is shorter than resolution latency; the presenter
    /// sees them last-write-wins.
    pub async fn handle_click(&self, page: &PageSnapshot, event: ClickEvent) -> ClickDecision {
        if event.button != MouseButton::Primary {
            return ClickDecision::reject(RejectReason::NonPrimaryButton);
        }

        if self.presenter.is_open() {
            if self.presenter.owns_node(event.target) {
                // The viewer handles its own clicks.
                return ClickDecision::reject(RejectReason::ViewerOpen);
            }
            debug!("click outside open viewer, closing it");
            self.presenter.close();
            return ClickDecision {
                suppress_default: true,
                outcome: ClickOutcome::ViewerClosed,
            };
        }

        {
            let mut gate = match self.gate.lock() {
                Ok(gate) => gate,
                Err(poisoned) => poisoned.into_inner(),
            };
            if !gate.try_acquire(event.timestamp_ms) {
                debug!(timestamp_ms = event.timestamp_ms, "click debounced");
                return ClickDecision::reject(RejectReason::Debounced);
            }
        }

        let Some(node) = page.element(event.target) else {
            return ClickDecision::reject(RejectReason::TargetNotFound);
        };

        if is_control_button(node) {
            // Play/pause/replay keep their native behavior.
            return ClickDecision::reject(RejectReason::ControlButton);
        }

        if !is_plausible_media_context(node, self.max_walk_depth) {
            return ClickDecision::reject(RejectReason::NoMediaContext);
        }

        self.suppressor.pause_ambient();

        let set = self.pipeline.extract_from_click(page, event.target).await;
        if set.success {
            self.presenter.present(set.clone());
        } else {
            self.suppressor.restore_ambient();
        }

        ClickDecision {
            suppress_default: true,
            outcome: ClickOutcome::Resolved(set),
        }
    }

    pub fn pipeline(&self) -> &ExtractionPipeline {
        &self.pipeline
    }
}

/// Video control buttons and the icon elements nested inside them.
fn is_control_button(node: ElementRef<'_>) -> bool {
    page::closest(node, CONTROL_WALK_DEPTH, |el| {
        if el.attr("data-testid") == Some("playButton") {
            return true;
        }
        el.value().name() == "button"
            && el.attr("aria-label").is_some_and(|label| {
                let label = label.to_ascii_lowercase();
                ["play", "pause", "replay", "mute"]
                    .iter()
                    .any(|k| label.contains(k))
            })
    })
    .is_some()
}

/// Cheap structural check that the click plausibly sits on media, run
/// before the full pipeline is paid for.
fn is_plausible_media_context(node: ElementRef<'_>, max_depth: u32) -> bool {
    let name = node.value().name();
    if name == "img" || name == "video" {
        return true;
    }

    if page::closest(node, max_depth, |el| {
        matches!(
            el.attr("data-testid"),
            Some("tweetPhoto") | Some("videoPlayer") | Some("videoComponent")
        )
    })
    .is_some()
    {
        return true;
    }

    if page::closest(node, max_depth, |el| {
        el.value().name() == "a"
            && el
                .attr("href")
                .is_some_and(|h| h.contains("/photo/") || h.contains("/video/"))
    })
    .is_some()
    {
        return true;
    }

    if let Some((container, _)) = page::find_post_container(node, max_depth) {
        let media = Selector::parse("img, video").expect("valid selector");
        return container.select(&media).next().is_some();
    }

    false
}
