//! URL classification: separating real CDN assets from extraction noise.
//!
//! The collector's pattern match is deliberately loose, so the manifest's
//! image lists carry favicons, decorative icons, and half-parsed fragments
//! alongside the real gallery media. Classification recognizes exactly two
//! families of downloadable asset:
//!
//! 1. **Site media** on the `website-editor.net` CDN pair. The `le-cdn` host
//!    only ever serves published site assets and is accepted outright; the
//!    shared `cdn` host also serves editor internals, so it is accepted only
//!    when the URL carries the `Signature`/`Expires` pair of a signed asset.
//! 2. **Instagram profile pictures**: any `cdninstagram.com` host whose path
//!    goes through the `/t51.82787-19/` profile-picture prefix and ends in a
//!    JPEG extension.
//!
//! Everything else is dropped without comment.

use crate::models::{AssetKind, ClassifiedAsset, ScrapeManifest};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Decode the one HTML entity the source feed produces.
///
/// Page markup escapes `&` in query strings as `&amp;`; nothing else appears
/// in practice, so this is a targeted replace rather than a full entity table.
pub fn decode_html_entities(input: &str) -> String {
    input.replace("&amp;", "&")
}

fn is_signed_cdn_url(url: &Url) -> bool {
    match url.host_str() {
        Some("le-cdn.website-editor.net") => true,
        Some("cdn.website-editor.net") => {
            let mut has_signature = false;
            let mut has_expires = false;
            for (key, _) in url.query_pairs() {
                match key.as_ref() {
                    "Signature" => has_signature = true,
                    "Expires" => has_expires = true,
                    _ => {}
                }
            }
            has_signature && has_expires
        }
        _ => false,
    }
}

fn is_instagram_profile_image(url: &Url) -> bool {
    // Url lowercases hosts on parse, so a plain comparison suffices.
    let Some(host) = url.host_str() else {
        return false;
    };
    if host != "cdninstagram.com" && !host.ends_with(".cdninstagram.com") {
        return false;
    }

    let path = url.path();
    if !path.contains("/t51.82787-19/") {
        return false;
    }

    let lower = path.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

/// Classify a parsed URL, signed site media taking priority.
pub fn classify(url: &Url) -> Option<AssetKind> {
    if is_signed_cdn_url(url) {
        Some(AssetKind::SignedCdnMedia)
    } else if is_instagram_profile_image(url) {
        Some(AssetKind::InstagramProfile)
    } else {
        None
    }
}

/// Walk every image list in the manifest and produce the deduplicated set of
/// downloadable assets, in first-seen order.
///
/// Each raw string is entity-decoded and parsed as an absolute URL; strings
/// that fail to parse are expected regex noise and are skipped silently.
/// Deduplication is by the parsed URL's canonical string form, so the same
/// image referenced from two pages downloads once.
pub fn extract_assets(manifest: &ScrapeManifest) -> Vec<ClassifiedAsset> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut assets = Vec::new();

    for (page, result) in manifest.iter() {
        for raw in &result.images {
            let decoded = decode_html_entities(raw);
            let Ok(url) = Url::parse(&decoded) else {
                continue;
            };
            let Some(kind) = classify(&url) else {
                continue;
            };
            if seen.insert(url.to_string()) {
                debug!(%page, url = %url, ?kind, "Recognized asset");
                assets.push(ClassifiedAsset { url, kind });
            }
        }
    }

    assets
}
