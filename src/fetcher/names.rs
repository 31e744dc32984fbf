//! Collision-safe output filenames for downloaded assets.
//!
//! Base names come from the URL's last path segment, sanitized down to
//! `[a-zA-Z0-9._-]`. Within one run every assigned name must be unique across
//! both output directories; a repeated base name gets a short hash of its
//! source URL spliced in before the extension, so the same input set always
//! produces the same names in the same order.

use once_cell::sync::Lazy;
use regex::Regex;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use url::Url;

static UNSAFE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("filename pattern must compile"));

/// Derive a filesystem-safe base name from a URL's path.
///
/// The last non-empty path segment is percent-decoded, `+` is mapped to `_`,
/// and every run of characters outside `[a-zA-Z0-9._-]` collapses to a single
/// `_`. A URL with no usable segment falls back to `file`.
pub fn safe_basename(url: &Url) -> String {
    let raw = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("file");

    // Segments whose percent-escapes are not valid UTF-8 keep their raw form.
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    };

    let underscored = decoded.replace('+', "_");
    let cleaned = UNSAFE_RUNS.replace_all(&underscored, "_").into_owned();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// First 8 hex digits of the SHA-1 of `input`.
pub fn short_hash(input: &str) -> String {
    let digest = Sha1::digest(input.as_bytes());
    hex::encode(digest)[..8].to_string()
}

/// Split `name` into stem and extension, keeping the dot with the extension.
///
/// A leading dot does not start an extension (`.hidden` has none), matching
/// the convention the output names were minted under.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// The set of output names already assigned in this run.
///
/// One registry spans both output directories, so a tsv asset and an
/// instagram asset can never silently share a name either. The registry knows
/// nothing about files already on disk from earlier runs; reruns overwrite by
/// deterministic path.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an output name for `base`, disambiguating with a hash of the
    /// source URL when the base name was already handed out.
    pub fn assign(&mut self, base: &str, source_url: &str) -> String {
        let name = if self.used.contains(base) {
            let (stem, ext) = split_extension(base);
            format!("{stem}-{}{ext}", short_hash(source_url))
        } else {
            base.to_string()
        };
        self.used.insert(name.clone());
        name
    }
}
