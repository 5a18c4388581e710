//! Post identity resolution.
//!
//! Five independent strategies, priority-ordered, each able to recover
//! `{post_id, author_handle, post_url}` from a clicked node on its own.
//! The resolver runs them in order and takes the first structurally valid
//! result; see [`resolver::IdentityResolver`].

pub mod ancestor_data_attr;
pub mod clicked_node;
pub mod dom_structure;
pub mod link_scan;
pub mod page_url;
pub mod resolver;

use regex::Regex;
use scraper::{ElementRef, Selector};

use lightbox_common::PostIdentity;

use crate::page::{self, PageSnapshot};

pub use resolver::IdentityResolver;

/// A single identity extraction approach. Implementations must be pure with
/// respect to the snapshot: same page, same node, same answer.
pub trait IdentityStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    /// Lower runs first.
    fn priority(&self) -> u32;
    fn extract(&self, page: &PageSnapshot, node: ElementRef<'_>) -> Option<PostIdentity>;
}

/// Attributes that can carry a post id directly on an element.
pub(crate) const ID_BEARING_ATTRIBUTES: &[&str] =
    &["data-tweet-id", "data-item-id", "data-testid", "data-focusable"];

/// Capture the numeric id from a `/status/<id>` path segment.
pub(crate) fn status_id_in(text: &str) -> Option<String> {
    let re = Regex::new(r"/status/(\d+)").expect("valid regex");
    re.captures(text).map(|c| c[1].to_string())
}

/// A fully numeric attribute value on `el`, checked across the known
/// id-bearing attributes in order.
pub(crate) fn id_from_attributes(el: ElementRef<'_>) -> Option<String> {
    for attr in ID_BEARING_ATTRIBUTES {
        if let Some(value) = el.attr(attr) {
            if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Decode the `..._<id>` cross-reference pattern used by `aria-labelledby`
/// token lists.
pub(crate) fn id_from_aria_labelledby(value: &str) -> Option<String> {
    let re = Regex::new(r"__(\d+)$").expect("valid regex");
    value
        .split_whitespace()
        .find_map(|token| re.captures(token).map(|c| c[1].to_string()))
}

/// Handle from a profile-shaped href: a single path segment, not a reserved
/// route, legal handle characters only.
pub(crate) fn handle_from_href(href: &str) -> Option<String> {
    let path = if let Some(p) = href.strip_prefix('/') {
        p
    } else if let Some((_, p)) = href
        .split_once("//")
        .and_then(|(_, rest)| rest.split_once('/'))
    {
        p
    } else {
        return None;
    };
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    let re = Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("valid regex");
    if !re.is_match(first) || first == "i" || first == "home" || first == "search" {
        return None;
    }
    Some(first.to_string())
}

/// Resolve the author handle independently of the id. Layered: the post
/// container's user-name link, then any profile-shaped link in the
/// container, then the page URL's first path segment.
pub(crate) fn author_handle(page: &PageSnapshot, node: ElementRef<'_>) -> Option<String> {
    if let Some((container, _)) = page::find_post_container(node, 10) {
        let user_link = Selector::parse(r#"a[data-testid="User-Name"]"#).expect("valid selector");
        for link in container.select(&user_link) {
            if let Some(handle) = link.attr("href").and_then(handle_from_href) {
                return Some(handle);
            }
        }

        let any_link = Selector::parse("a[href]").expect("valid selector");
        for link in container.select(&any_link) {
            let href = link.attr("href").unwrap_or("");
            if href.contains("/status/")
                || href.contains("/photo/")
                || href.contains("/video/")
                || href.contains("/hashtag/")
                || href.contains("/search")
            {
                continue;
            }
            if let Some(handle) = handle_from_href(href) {
                return Some(handle);
            }
        }
    }

    page.page_handle()
}

/// Canonical post URL for a resolved identity.
pub(crate) fn post_url_for(handle: &str, post_id: &str) -> String {
    format!("https://x.com/{handle}/status/{post_id}")
}

/// Assemble an identity, degrading a missing handle to the placeholder.
pub(crate) fn build_identity(
    page: &PageSnapshot,
    node: ElementRef<'_>,
    post_id: String,
    method: &'static str,
    confidence: f64,
    depth: u32,
) -> PostIdentity {
    let handle =
        author_handle(page, node).unwrap_or_else(|| PostIdentity::UNKNOWN_HANDLE.to_string());
    let post_url = post_url_for(&handle, &post_id);
    PostIdentity {
        post_id,
        author_handle: handle,
        post_url,
        extraction_method: method.to_string(),
        confidence,
        discovered_at_depth: depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_id_captures_digits_only() {
        assert_eq!(status_id_in("/alice/status/991").as_deref(), Some("991"));
        assert_eq!(status_id_in("https://x.com/a/status/42/photo/1").as_deref(), Some("42"));
        assert_eq!(status_id_in("/alice/statuses/abc"), None);
    }

    #[test]
    fn aria_labelledby_decodes_trailing_id_token() {
        assert_eq!(
            id_from_aria_labelledby("header id__1234567890 footer").as_deref(),
            Some("1234567890")
        );
        assert_eq!(id_from_aria_labelledby("plain tokens only"), None);
    }

    #[test]
    fn handle_rejects_multi_segment_and_reserved_paths() {
        assert_eq!(handle_from_href("/alice").as_deref(), Some("alice"));
        assert_eq!(handle_from_href("https://x.com/bob").as_deref(), Some("bob"));
        assert_eq!(handle_from_href("/alice/status/42"), None);
        assert_eq!(handle_from_href("/home"), None);
        assert_eq!(handle_from_href("/way-too-long-for-a-real-handle"), None);
    }
}
