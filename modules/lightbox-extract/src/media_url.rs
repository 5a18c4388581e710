//! Media URL validation, classification, and original-quality upgrades.

use lightbox_common::MediaType;
use url::Url;

/// Substrings marking a URL as decoration rather than post media.
const NON_CONTENT_MARKERS: &[&str] = &["profile_images", "profile_banners", "/emoji/"];

/// Accept only absolute http(s) URLs that are not known non-content
/// (avatars, banners, emoji sprites).
pub fn is_content_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    if NON_CONTENT_MARKERS.iter().any(|m| trimmed.contains(m)) {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(parsed) => parsed.scheme() == "http" || parsed.scheme() == "https",
        Err(_) => false,
    }
}

/// Upgrade a CDN image URL to its original-quality variant by forcing
/// `name=orig`, preserving every other query parameter.
///
/// Non-CDN URLs and URLs already carrying `name=orig` come back unchanged.
pub fn upgrade_to_original(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };
    let is_media_cdn = parsed
        .host_str()
        .is_some_and(|h| h.ends_with("twimg.com"))
        && parsed.path().starts_with("/media/");
    if !is_media_cdn {
        return raw.to_string();
    }
    if parsed
        .query_pairs()
        .any(|(k, v)| k == "name" && v == "orig")
    {
        return raw.to_string();
    }

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != "name")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut query = parsed.query_pairs_mut();
        query.clear();
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        query.append_pair("name", "orig");
    }
    parsed.to_string()
}

/// Classify a URL found in a deferred-load attribute. Anything carrying a
/// video marker or extension is video; everything else is image.
pub fn infer_media_type(url: &str) -> MediaType {
    if url.contains("video") || url.contains(".mp4") || url.contains(".webm") {
        MediaType::Video
    } else {
        MediaType::Image
    }
}

/// Pull the URL out of an inline-style `background-image: url(...)`
/// declaration. Handles single-quoted, double-quoted, and bare forms;
/// `none` and gradient values yield `None`.
pub fn background_image_url(style: &str) -> Option<String> {
    for declaration in style.split(';') {
        let mut parts = declaration.splitn(2, ':');
        let property = parts.next()?.trim();
        if !property.eq_ignore_ascii_case("background-image")
            && !property.eq_ignore_ascii_case("background")
        {
            continue;
        }
        let value = parts.next().unwrap_or("").trim();
        let Some(start) = value.find("url(") else {
            continue;
        };
        let rest = &value[start + 4..];
        let Some(end) = rest.find(')') else {
            continue;
        };
        let inner = rest[..end].trim().trim_matches('"').trim_matches('\'');
        if inner.is_empty() {
            continue;
        }
        return Some(inner.to_string());
    }
    None
}
