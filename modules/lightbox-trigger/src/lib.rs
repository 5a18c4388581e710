//! Click-side front end for the media lightbox: debounce gating, click
//! filtering, and hand-off between the extraction pipeline and the
//! embedder's viewer.

pub mod coordinator;
pub mod debounce;
pub mod traits;

pub use coordinator::{
    ClickCoordinator, ClickDecision, ClickEvent, ClickOutcome, MouseButton, RejectReason,
};
pub use debounce::DebounceGate;
pub use traits::{GalleryPresenter, VideoSuppressor};

/// Install the default tracing subscriber for binaries embedding the
/// coordinator. Library code only emits events; the embedder decides the
/// sink by calling this (or installing its own subscriber) once at startup.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lightbox_extract=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
