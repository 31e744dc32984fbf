//! Asset fetcher: reads the manifest and mirrors recognized media to disk.
//!
//! The fetcher is the second, independent stage of the pipeline. It consumes
//! whatever manifest the collector last wrote, classifies the embedded URLs
//! (see [`classify`]), derives collision-safe output names (see [`names`]),
//! and downloads each asset sequentially with browser-like headers — several
//! CDNs reject hot-linked requests without a plausible referer.
//!
//! Per-asset failures (transport errors, non-2xx responses) are reported and
//! counted but never abort the run. Structural failures are fatal: a missing
//! or malformed manifest, an uncreatable output directory, or a file that
//! cannot be written.
//!
//! Progress is reported on stdout, one line per asset:
//!
//! ```text
//! OK  public/media/tsv/team.jpg  <=  https://le-cdn.website-editor.net/team.jpg
//! ERR public/media/tsv/gone.jpg  <=  https://le-cdn.website-editor.net/gone.jpg
//!     HTTP 404
//!
//! Done. Downloaded: 1, Failed: 1, Total: 2
//! ```

pub mod classify;
pub mod names;

use crate::models::{AssetKind, ClassifiedAsset, DownloadRecord, RunSummary, ScrapeManifest};
use crate::utils::ensure_writable_dir;
use names::NameRegistry;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use reqwest::Client;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ShadcenSiteBot/1.0)";
const ACCEPT_IMAGES: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";
const SOURCE_SITE_REFERER: &str = "https://www.tsvplattenhardt.de/";

/// Where downloaded assets land, by category.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    /// Site media from the `website-editor.net` CDN pair.
    pub tsv: PathBuf,
    /// Instagram profile pictures.
    pub instagram: PathBuf,
}

impl OutputDirs {
    fn for_kind(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::SignedCdnMedia => &self.tsv,
            AssetKind::InstagramProfile => &self.instagram,
        }
    }
}

/// Run the full fetcher stage against a manifest file.
///
/// Reads and parses the manifest (both fatal on failure), extracts the
/// deduplicated asset set, prepares the output directories, and downloads
/// everything sequentially.
#[instrument(level = "info", skip_all, fields(manifest = %manifest_path.display()))]
pub async fn run(manifest_path: &Path, dirs: &OutputDirs) -> Result<RunSummary, Box<dyn Error>> {
    let raw = fs::read_to_string(manifest_path).await?;
    let manifest: ScrapeManifest = serde_json::from_str(&raw)?;
    info!(pages = manifest.len(), "Loaded scrape manifest");

    let assets = classify::extract_assets(&manifest);
    info!(count = assets.len(), "Recognized downloadable assets");

    ensure_writable_dir(&dirs.tsv).await?;
    ensure_writable_dir(&dirs.instagram).await?;

    let client = build_client()?;
    download_all(&client, &assets, dirs).await
}

/// Build the download client: custom user-agent, image-favoring accept
/// header, and a referer pointing at the source site on every request.
pub fn build_client() -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_IMAGES));
    headers.insert(REFERER, HeaderValue::from_static(SOURCE_SITE_REFERER));
    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
}

/// Download every asset in order, reporting one stdout line per attempt and
/// a final summary.
///
/// Network and HTTP failures are isolated per asset; a failed write of the
/// response body to disk is fatal and propagates immediately.
pub async fn download_all(
    client: &Client,
    assets: &[ClassifiedAsset],
    dirs: &OutputDirs,
) -> Result<RunSummary, Box<dyn Error>> {
    let mut registry = NameRegistry::new();
    let mut records: Vec<DownloadRecord> = Vec::with_capacity(assets.len());

    for asset in assets {
        let base = names::safe_basename(&asset.url);
        let out_name = registry.assign(&base, asset.url.as_str());
        let out_path = dirs.for_kind(asset.kind).join(&out_name);

        let record = match fetch_asset(client, &asset.url).await {
            Ok(body) => {
                fs::write(&out_path, &body).await?;
                debug!(path = %out_path.display(), bytes = body.len(), "Wrote asset");
                DownloadRecord {
                    url: asset.url.to_string(),
                    path: out_path,
                    error: None,
                }
            }
            Err(e) => {
                warn!(url = %asset.url, error = %e, "Asset download failed");
                DownloadRecord {
                    url: asset.url.to_string(),
                    path: out_path,
                    error: Some(e.to_string()),
                }
            }
        };

        report_record(&record);
        records.push(record);
    }

    let summary = RunSummary::from_records(&records);
    println!(
        "\nDone. Downloaded: {}, Failed: {}, Total: {}",
        summary.downloaded,
        summary.failed,
        summary.total()
    );
    info!(
        downloaded = summary.downloaded,
        failed = summary.failed,
        total = summary.total(),
        "Fetcher run complete"
    );
    Ok(summary)
}

/// GET one asset and return its body. Non-2xx responses are failures and the
/// body is discarded.
async fn fetch_asset(client: &Client, url: &Url) -> Result<Vec<u8>, Box<dyn Error>> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()).into());
    }
    Ok(response.bytes().await?.to_vec())
}

fn report_record(record: &DownloadRecord) {
    match &record.error {
        None => println!("OK  {}  <=  {}", record.path.display(), record.url),
        Some(message) => {
            println!("ERR {}  <=  {}", record.path.display(), record.url);
            println!("    {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetKind;

    #[test]
    fn test_output_dirs_routing() {
        let dirs = OutputDirs {
            tsv: PathBuf::from("public/media/tsv"),
            instagram: PathBuf::from("public/media/instagram"),
        };
        assert_eq!(
            dirs.for_kind(AssetKind::SignedCdnMedia),
            Path::new("public/media/tsv")
        );
        assert_eq!(
            dirs.for_kind(AssetKind::InstagramProfile),
            Path::new("public/media/instagram")
        );
    }
}
