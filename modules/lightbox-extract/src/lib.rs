//! Media resolution pipeline: from a clicked node in a page snapshot to a
//! normalized, ordered media set.
//!
//! The host page's markup is undocumented and restructured without notice;
//! nothing here assumes a stable DOM contract. Identity resolution runs an
//! ordered chain of independent strategies, the authoritative service is
//! preferred when an identity exists, and a four-scanner DOM fallback
//! covers everything else.

pub mod fallback;
pub mod identity;
pub mod media_url;
pub mod page;
pub mod pipeline;
pub mod primary;
pub mod scanners;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

#[cfg(test)]
mod chain_tests;

pub use fallback::CompositeFallback;
pub use identity::IdentityResolver;
pub use page::PageSnapshot;
pub use pipeline::{ExtractionPipeline, PipelineStats};
pub use primary::{MediaProvider, PrimaryResolver};
