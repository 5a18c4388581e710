//! Trait seams for the coordinator's collaborators.
//!
//! The viewer and the ambient-video controller live with the embedder;
//! behind these traits the coordinator is testable with in-memory mocks.

use ego_tree::NodeId;

use lightbox_common::ResolvedMediaSet;

/// Pauses and restores ambient media playback around a resolution.
/// Fire-and-forget: the coordinator never consumes a return value.
pub trait VideoSuppressor: Send + Sync {
    fn pause_ambient(&self);
    fn restore_ambient(&self);
}

/// The modal viewer. Receives resolved sets; owns its own rendering.
pub trait GalleryPresenter: Send + Sync {
    fn present(&self, set: ResolvedMediaSet);

    /// Whether the viewer overlay is currently open.
    fn is_open(&self) -> bool;

    /// Whether `node` sits inside the open viewer's overlay.
    fn owns_node(&self, node: NodeId) -> bool;

    fn close(&self);
}
