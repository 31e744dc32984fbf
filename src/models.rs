//! Data models for the scrape-and-mirror pipeline.
//!
//! This module defines the structures shared between the two pipeline stages:
//! - [`PageResult`] / [`PageStatus`]: the per-page outcome recorded by the collector
//! - [`ScrapeManifest`]: the page→result mapping persisted between stages
//! - [`AssetKind`] / [`ClassifiedAsset`]: a candidate URL recognized as downloadable media
//! - [`DownloadRecord`] / [`RunSummary`]: per-asset and aggregate fetch outcomes
//!
//! The manifest is the sole interchange artifact between the collector and the
//! fetcher, so its JSON shape is fixed: a top-level object keyed by page URL in
//! page-list order, values of the form
//! `{ "status": number | "error", "images": [..] }` with an optional `"error"`
//! member between `status` and `images`. [`ScrapeManifest`] and [`PageStatus`]
//! carry hand-written serde impls to reproduce that shape byte-for-byte.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Outcome of fetching one page: the HTTP status code, or the `"error"`
/// sentinel when the request never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The server answered; any status code is recorded as-is, 2xx or not.
    Http(u16),
    /// Transport failure (DNS, connect, TLS, timeout). Serialized as `"error"`.
    TransportError,
}

impl Serialize for PageStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageStatus::Http(code) => serializer.serialize_u16(*code),
            PageStatus::TransportError => serializer.serialize_str("error"),
        }
    }
}

impl<'de> Deserialize<'de> for PageStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StatusVisitor;

        impl<'de> Visitor<'de> for StatusVisitor {
            type Value = PageStatus;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an HTTP status code or the string \"error\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<PageStatus, E> {
                u16::try_from(v)
                    .map(PageStatus::Http)
                    .map_err(|_| E::custom(format!("status code out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<PageStatus, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom(format!("status code out of range: {v}")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PageStatus, E> {
                if v == "error" {
                    Ok(PageStatus::TransportError)
                } else {
                    Err(E::custom(format!("unknown status sentinel: {v:?}")))
                }
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

/// One collector entry: what happened when a page was fetched and which image
/// URLs its markup contained.
///
/// `images` holds the URLs exactly as they appeared in the raw HTML (entities
/// and all), distinct within the page, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// HTTP status of the page fetch, or the transport-failure sentinel.
    pub status: PageStatus,
    /// Failure description; present only when `status` is the sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Deduplicated image URL strings as found in the page markup.
    pub images: Vec<String>,
}

impl PageResult {
    /// Record a successful page fetch.
    pub fn ok(status: u16, images: Vec<String>) -> Self {
        Self {
            status: PageStatus::Http(status),
            error: None,
            images,
        }
    }

    /// Record a transport failure. The page contributes no images.
    pub fn failed(message: String) -> Self {
        Self {
            status: PageStatus::TransportError,
            error: Some(message),
            images: Vec::new(),
        }
    }
}

/// The page→result mapping bridging the collector and the fetcher.
///
/// Entries keep insertion order so the serialized document lists pages in the
/// order they were scraped, matching the artifact the fetcher already
/// interoperates with. Keys are unique; inserting an existing key replaces its
/// value in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrapeManifest {
    entries: Vec<(String, PageResult)>,
}

impl ScrapeManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the result for a page URL, preserving the position of
    /// an existing key.
    pub fn insert(&mut self, page: String, result: PageResult) {
        match self.entries.iter_mut().find(|(key, _)| *key == page) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((page, result)),
        }
    }

    pub fn get(&self, page: &str) -> Option<&PageResult> {
        self.entries
            .iter()
            .find(|(key, _)| key == page)
            .map(|(_, result)| result)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageResult)> {
        self.entries.iter().map(|(key, result)| (key.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ScrapeManifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (page, result) in &self.entries {
            map.serialize_entry(page, result)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScrapeManifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = ScrapeManifest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of page URL to page result")
            }

            fn visit_map<A>(self, mut access: A) -> Result<ScrapeManifest, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut manifest = ScrapeManifest::new();
                while let Some((page, result)) = access.next_entry::<String, PageResult>()? {
                    manifest.insert(page, result);
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}

/// Category assigned to a recognized media URL; decides the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Site media on the `website-editor.net` CDN pair (signed on the shared host).
    SignedCdnMedia,
    /// Profile picture on the Instagram CDN.
    InstagramProfile,
}

/// A candidate URL that passed classification, ready to download.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedAsset {
    pub url: Url,
    pub kind: AssetKind,
}

/// Outcome of one download attempt.
#[derive(Debug, Clone)]
pub struct DownloadRecord {
    /// Source URL, in canonical string form.
    pub url: String,
    /// Target path the asset was (or would have been) written to.
    pub path: PathBuf,
    /// Failure message; `None` means the asset was written.
    pub error: Option<String>,
}

impl DownloadRecord {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate counts for one fetcher run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.downloaded + self.failed
    }

    /// Sum per-asset outcomes. Order-independent.
    pub fn from_records(records: &[DownloadRecord]) -> Self {
        let downloaded = records.iter().filter(|r| r.succeeded()).count();
        Self {
            downloaded,
            failed: records.len() - downloaded,
        }
    }
}
