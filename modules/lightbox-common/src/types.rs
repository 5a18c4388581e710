use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Media Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
        }
    }
}

/// One media attachment discovered for a post.
///
/// `id` is deterministic from the producing strategy and the item's position
/// (`img_0`, `video_2`, `primary_1`, ...). It is unique only within one
/// [`ResolvedMediaSet`] and carries no durable meaning across resolutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    /// Best-quality URL for the viewer (CDN originals where recoverable).
    pub url: String,
    /// The URL exactly as it appeared in the page markup.
    pub original_url: String,
    pub media_type: MediaType,
    pub thumbnail_url: Option<String>,
    pub alt_text: Option<String>,
    /// Which scanner or resolver produced this item.
    pub source_strategy: String,
}

// --- Post Identity ---

/// Stable identity of the post surrounding a clicked node.
///
/// `post_id` is always a numeric string; resolvers reject anything else.
/// `author_handle` degrades to the literal `"unknown"` when no handle can be
/// recovered — a missing handle never fails identity resolution, a missing id
/// always does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostIdentity {
    pub post_id: String,
    pub author_handle: String,
    pub post_url: String,
    /// Name of the strategy that produced this identity.
    pub extraction_method: String,
    /// Per-strategy confidence in [0, 1]. Produced for diagnostics and kept
    /// in the serialized output; resolution order is pure priority, never
    /// confidence.
    pub confidence: f64,
    /// Ancestor levels walked from the clicked node before the id was found.
    pub discovered_at_depth: u32,
}

impl PostIdentity {
    /// Placeholder handle used when no author link is recoverable.
    pub const UNKNOWN_HANDLE: &'static str = "unknown";
}

// --- Resolution Result ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveSource {
    /// Authoritative data-service result.
    Primary,
    /// DOM-scan result.
    Fallback,
    /// No media could be located for this click.
    None,
    /// An unexpected failure was absorbed at the pipeline boundary.
    Error,
}

impl std::fmt::Display for ResolveSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveSource::Primary => write!(f, "primary"),
            ResolveSource::Fallback => write!(f, "fallback"),
            ResolveSource::None => write!(f, "none"),
            ResolveSource::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveMetadata {
    pub resolved_at: DateTime<Utc>,
    /// Stages taken, in order: `identity:<strategy>`, `primary`, `fallback`.
    pub strategy_chain: Vec<String>,
    pub duration_ms: f64,
    pub error: Option<String>,
}

impl ResolveMetadata {
    pub fn new() -> Self {
        Self {
            resolved_at: Utc::now(),
            strategy_chain: Vec::new(),
            duration_ms: 0.0,
            error: None,
        }
    }
}

impl Default for ResolveMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Final output of one resolution attempt, handed to the presenter.
///
/// Invariants, enforced by the constructors below:
/// - `success == true` implies `items` is non-empty and
///   `clicked_index < items.len()`
/// - `source` of `None` or `Error` implies `items` is empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMediaSet {
    pub success: bool,
    /// Insertion order mirrors visual discovery order (left-to-right,
    /// top-to-bottom).
    pub items: Vec<MediaItem>,
    pub clicked_index: usize,
    pub source: ResolveSource,
    pub metadata: ResolveMetadata,
}

impl ResolvedMediaSet {
    /// Successful resolution. Clamps `clicked_index` into range rather than
    /// panicking — a scanner miscount must not take the viewer down.
    pub fn resolved(items: Vec<MediaItem>, clicked_index: usize, source: ResolveSource) -> Self {
        debug_assert!(!items.is_empty());
        let clicked_index = clicked_index.min(items.len().saturating_sub(1));
        Self {
            success: !items.is_empty(),
            items,
            clicked_index,
            source,
            metadata: ResolveMetadata::new(),
        }
    }

    /// Terminal failure: no media for this click.
    pub fn empty(source: ResolveSource, error: impl Into<String>) -> Self {
        Self {
            success: false,
            items: Vec::new(),
            clicked_index: 0,
            source,
            metadata: ResolveMetadata {
                error: Some(error.into()),
                ..ResolveMetadata::new()
            },
        }
    }

    /// Absorbed unexpected failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(ResolveSource::Error, message)
    }
}

// --- Data-Service Wire Type ---

/// One entry as returned by the authoritative media provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMediaEntry {
    pub media_type: MediaType,
    pub download_url: String,
    pub preview_url: Option<String>,
    /// Position of this entry within the post's media set.
    pub index: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, url: &str) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            url: url.to_string(),
            original_url: url.to_string(),
            media_type: MediaType::Image,
            thumbnail_url: None,
            alt_text: None,
            source_strategy: "test".to_string(),
        }
    }

    #[test]
    fn resolved_clamps_out_of_range_clicked_index() {
        let set = ResolvedMediaSet::resolved(
            vec![item("a", "https://cdn.example/a.jpg")],
            7,
            ResolveSource::Fallback,
        );
        assert!(set.success);
        assert_eq!(set.clicked_index, 0);
    }

    #[test]
    fn empty_set_has_no_items_and_carries_error() {
        let set = ResolvedMediaSet::empty(ResolveSource::None, "no container");
        assert!(!set.success);
        assert!(set.items.is_empty());
        assert_eq!(set.metadata.error.as_deref(), Some("no container"));
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&ResolveSource::Primary).unwrap();
        assert_eq!(json, "\"primary\"");
        let json = serde_json::to_string(&ResolveSource::Fallback).unwrap();
        assert_eq!(json, "\"fallback\"");
    }
}
