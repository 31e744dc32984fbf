//! # Cheer Media Mirror
//!
//! A two-stage pipeline that mirrors the media assets of the TSV Plattenhardt
//! cheerleading pages into local folders.
//!
//! ## Architecture
//!
//! 1. **Collect**: fetch a fixed list of pages, pattern-match the raw HTML
//!    for image URLs, and write a page→result manifest as pretty-printed JSON
//! 2. **Fetch**: read the manifest, classify the URLs down to real CDN assets
//!    (signed site media and Instagram profile pictures), deduplicate
//!    globally, and download each asset to a categorized directory under a
//!    collision-safe filename
//!
//! The stages are independent batch jobs connected only through the manifest
//! file; either can be rerun on its own. See the module docs for the
//! fine print of each stage.

pub mod cli;
pub mod collector;
pub mod fetcher;
pub mod models;
pub mod utils;
