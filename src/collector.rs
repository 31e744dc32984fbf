//! Page collector: turns the fixed page list into a [`ScrapeManifest`].
//!
//! The collector fetches each configured page, pattern-matches the raw HTML
//! for image URLs, and records one [`PageResult`] per page. Pages are fetched
//! with plain GETs (redirects followed, no custom headers) and a failing page
//! is recorded as data rather than aborting the run — the partner site's
//! gallery pages come and go, and one dead page must not cost us the rest.
//!
//! # URL pattern
//!
//! Candidate URLs are any `http(s)` substring ending in a known raster image
//! extension, optionally followed by a query string. The match is loose on
//! purpose: it runs over raw markup (inline CSS, JSON islands, `srcset`
//! attributes), and the fetcher's classifier is what separates real CDN
//! assets from the incidental noise this pattern picks up.

use crate::models::{PageResult, ScrapeManifest};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::utils::truncate_for_log;

/// The pages scanned for media URLs: the club's cheerleading and gallery
/// pages plus the team's Instagram profile.
pub const PAGES: &[&str] = &[
    "https://www.tsvplattenhardt.de/cheerleading46a5e1b6",
    "https://www.tsvplattenhardt.de/schnupperstunden-cheerleading",
    "https://www.tsvplattenhardt.de/cheerleading",
    "https://www.tsvplattenhardt.de/galerie92b76788",
    "https://www.tsvplattenhardt.de/galerie",
    "https://www.instagram.com/infinity_cheer_allstars/",
];

static IMAGE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)https?://[^"'<>\s]+\.(?:png|jpe?g|webp|gif)(?:\?[^"'<>\s]*)?"#)
        .expect("image URL pattern must compile")
});

/// Extract candidate image URLs from raw HTML.
///
/// Matches are returned in order of first appearance, deduplicated within the
/// page. The strings are taken verbatim from the markup; HTML entities are
/// left for the fetcher to decode.
pub fn extract_image_urls(html: &str) -> Vec<String> {
    IMAGE_URL_RE
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .unique()
        .collect()
}

/// Collect every configured page into a manifest.
///
/// Pages are fetched one at a time; each produces exactly one manifest entry
/// keyed by its exact URL string, success or not.
#[instrument(level = "info", skip_all, fields(pages = pages.len()))]
pub async fn collect(pages: &[&str]) -> ScrapeManifest {
    let results: Vec<(String, PageResult)> = stream::iter(pages.iter().copied())
        .then(|page| async move { (page.to_string(), collect_page(page).await) })
        .collect()
        .await;

    let mut manifest = ScrapeManifest::new();
    for (page, result) in results {
        manifest.insert(page, result);
    }

    info!(pages = manifest.len(), "Collected all pages");
    manifest
}

/// Fetch one page and record its outcome. Never fails: transport errors
/// become the `"error"` sentinel with an empty image list.
#[instrument(level = "info", skip_all, fields(%page))]
async fn collect_page(page: &str) -> PageResult {
    match fetch_page(page).await {
        Ok((status, images)) => {
            info!(status, images = images.len(), "Indexed page");
            PageResult::ok(status, images)
        }
        Err(e) => {
            warn!(error = %e, "Page fetch failed");
            PageResult::failed(e.to_string())
        }
    }
}

async fn fetch_page(page: &str) -> Result<(u16, Vec<String>), reqwest::Error> {
    let response = reqwest::get(page).await?;
    let status = response.status().as_u16();
    let html = response.text().await?;
    debug!(
        status,
        bytes = html.len(),
        preview = %truncate_for_log(&html, 200),
        "Fetched page body"
    );
    // The body is scanned whatever the status; error pages that still carry
    // image markup contribute their URLs under the recorded status.
    Ok((status, extract_image_urls(&html)))
}

/// Serialize the manifest as pretty-printed JSON and overwrite `path`.
///
/// The parent directory is created if missing. This is the only fatal error
/// surface of the collector stage.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_manifest(
    manifest: &ScrapeManifest,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(manifest)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(path, json).await?;
    info!(pages = manifest.len(), "Wrote scrape manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_finds_each_extension() {
        let html = r#"
            <img src="https://cdn.example.net/a.png">
            <img src="https://cdn.example.net/b.jpg">
            <img src="https://cdn.example.net/c.jpeg">
            <div style="background:url(https://cdn.example.net/d.webp)"></div>
            <img src="http://cdn.example.net/e.gif">
        "#;
        let urls = extract_image_urls(html);
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.net/a.png",
                "https://cdn.example.net/b.jpg",
                "https://cdn.example.net/c.jpeg",
                "https://cdn.example.net/d.webp",
                "http://cdn.example.net/e.gif",
            ]
        );
    }

    #[test]
    fn test_extract_keeps_query_string() {
        let html = r#"<img src="https://cdn.example.net/pic.jpg?Signature=abc&amp;Expires=1">"#;
        let urls = extract_image_urls(html);
        assert_eq!(
            urls,
            vec!["https://cdn.example.net/pic.jpg?Signature=abc&amp;Expires=1"]
        );
    }

    #[test]
    fn test_extract_dedupes_preserving_first_seen_order() {
        let html = r#"
            <img src="https://cdn.example.net/z.png">
            <img src="https://cdn.example.net/a.png">
            <img src="https://cdn.example.net/z.png">
        "#;
        let urls = extract_image_urls(html);
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.net/z.png",
                "https://cdn.example.net/a.png",
            ]
        );
    }

    #[test]
    fn test_extract_is_case_insensitive_on_extension() {
        let html = r#"<img src="https://cdn.example.net/SHOUT.PNG">"#;
        assert_eq!(
            extract_image_urls(html),
            vec!["https://cdn.example.net/SHOUT.PNG"]
        );
    }

    #[test]
    fn test_extract_ignores_non_image_urls() {
        let html = r#"
            <a href="https://example.com/page.html">link</a>
            <script src="https://example.com/app.js"></script>
        "#;
        assert!(extract_image_urls(html).is_empty());
    }

    #[test]
    fn test_extract_stops_at_quotes_and_whitespace() {
        let html = r#"<img src="https://cdn.example.net/a.png" alt="https not a url">"#;
        assert_eq!(
            extract_image_urls(html),
            vec!["https://cdn.example.net/a.png"]
        );
    }
}
