//! Parsed-page model the pipeline works against.
//!
//! A [`PageSnapshot`] is an immutable parse of the host page's markup at
//! click time, plus the page URL. Clicked nodes are addressed by
//! `ego_tree::NodeId` into the snapshot; the snapshot never outlives one
//! resolution, so node ids are never stale within it.

use ego_tree::NodeId;
use scraper::{ElementRef, Html};
use url::Url;

/// Path segments that can never be an author handle.
const NON_PROFILE_SEGMENTS: &[&str] = &[
    "home",
    "explore",
    "search",
    "notifications",
    "messages",
    "settings",
    "hashtag",
    "i",
];

pub struct PageSnapshot {
    html: Html,
    page_url: Option<Url>,
}

impl PageSnapshot {
    /// Parse page markup. An unparseable `page_url` is treated as absent
    /// rather than an error; URL-based strategies simply won't match.
    pub fn parse(markup: &str, page_url: Option<&str>) -> Self {
        Self {
            html: Html::parse_document(markup),
            page_url: page_url.and_then(|u| Url::parse(u).ok()),
        }
    }

    pub fn document(&self) -> &Html {
        &self.html
    }

    pub fn page_url(&self) -> Option<&Url> {
        self.page_url.as_ref()
    }

    /// Look up an element by node id. Returns `None` for ids that address
    /// text or comment nodes, or ids from a different snapshot.
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// First path segment of the page URL, if it looks like a profile handle.
    pub fn page_handle(&self) -> Option<String> {
        let url = self.page_url.as_ref()?;
        let segment = url.path_segments()?.find(|s| !s.is_empty())?;
        if NON_PROFILE_SEGMENTS.contains(&segment) {
            return None;
        }
        Some(segment.to_string())
    }
}

/// Element-only ancestors of `el`, nearest first. Excludes `el` itself.
pub fn ancestors<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.ancestors().filter_map(ElementRef::wrap)
}

/// Nearest of `el` or its ancestors (up to `max_depth` levels above it)
/// matching `pred`. Depth 0 is `el` itself.
pub fn closest<'a>(
    el: ElementRef<'a>,
    max_depth: u32,
    pred: impl Fn(ElementRef<'a>) -> bool,
) -> Option<(ElementRef<'a>, u32)> {
    if pred(el) {
        return Some((el, 0));
    }
    for (depth, ancestor) in ancestors(el).enumerate() {
        let depth = depth as u32 + 1;
        if depth > max_depth {
            return None;
        }
        if pred(ancestor) {
            return Some((ancestor, depth));
        }
    }
    None
}

/// True when `outer` is a strict ancestor of `inner`.
pub fn contains(outer: ElementRef<'_>, inner: ElementRef<'_>) -> bool {
    inner.ancestors().any(|n| n.id() == outer.id())
}

/// Three-way containment: the scanned element matches the clicked node when
/// it is the node, wraps it, or sits inside it. Click targets are routinely
/// nested icons inside the real media element, or media inside a larger
/// clickable wrapper, so equality alone misses most real clicks.
pub fn related(a: ElementRef<'_>, b: ElementRef<'_>) -> bool {
    a.id() == b.id() || contains(a, b) || contains(b, a)
}

/// Structural check for containers known to wrap exactly one post.
pub fn is_post_container(el: ElementRef<'_>) -> bool {
    el.value().name() == "article"
        || el.attr("role") == Some("article")
        || el.attr("data-testid") == Some("tweet")
}

/// Smallest ancestor container that plausibly wraps one post, with the
/// depth it was found at.
pub fn find_post_container<'a>(
    el: ElementRef<'a>,
    max_depth: u32,
) -> Option<(ElementRef<'a>, u32)> {
    closest(el, max_depth, is_post_container)
}
