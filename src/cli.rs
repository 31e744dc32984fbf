//! Command-line interface definitions for the media mirror.
//!
//! The two pipeline stages are exposed as subcommands. All paths default to
//! the fixed locations the pipeline has always used, so `collect` followed by
//! `fetch` with no flags reproduces a standard run; the flags exist for
//! redirecting output in ad-hoc and test runs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_MANIFEST: &str = "scripts/scraped-images.json";

/// Command-line arguments for the media mirror.
///
/// # Examples
///
/// ```sh
/// # Scrape the configured pages and write the manifest
/// cheer_media_mirror collect
///
/// # Download the recognized assets from the manifest
/// cheer_media_mirror fetch
///
/// # Same, into a scratch directory
/// cheer_media_mirror fetch --tsv-dir /tmp/tsv --instagram-dir /tmp/instagram
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape the configured pages for image URLs and write the manifest
    Collect {
        /// Path of the manifest file to write
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,
    },
    /// Download the recognized media assets listed in the manifest
    Fetch {
        /// Path of the manifest file to read
        #[arg(short, long, default_value = DEFAULT_MANIFEST)]
        manifest: PathBuf,

        /// Output directory for site media from the CDN
        #[arg(long, default_value = "public/media/tsv")]
        tsv_dir: PathBuf,

        /// Output directory for Instagram profile images
        #[arg(long, default_value = "public/media/instagram")]
        instagram_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_defaults() {
        let cli = Cli::parse_from(["cheer_media_mirror", "collect"]);
        match cli.command {
            Commands::Collect { manifest } => {
                assert_eq!(manifest, PathBuf::from("scripts/scraped-images.json"));
            }
            other => panic!("expected collect, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::parse_from(["cheer_media_mirror", "fetch"]);
        match cli.command {
            Commands::Fetch {
                manifest,
                tsv_dir,
                instagram_dir,
            } => {
                assert_eq!(manifest, PathBuf::from("scripts/scraped-images.json"));
                assert_eq!(tsv_dir, PathBuf::from("public/media/tsv"));
                assert_eq!(instagram_dir, PathBuf::from("public/media/instagram"));
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_overrides() {
        let cli = Cli::parse_from([
            "cheer_media_mirror",
            "fetch",
            "--manifest",
            "/tmp/manifest.json",
            "--tsv-dir",
            "/tmp/tsv",
            "--instagram-dir",
            "/tmp/instagram",
        ]);
        match cli.command {
            Commands::Fetch {
                manifest,
                tsv_dir,
                instagram_dir,
            } => {
                assert_eq!(manifest, PathBuf::from("/tmp/manifest.json"));
                assert_eq!(tsv_dir, PathBuf::from("/tmp/tsv"));
                assert_eq!(instagram_dir, PathBuf::from("/tmp/instagram"));
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }
}
