//! Binary entry point: tracing setup, CLI dispatch, and run timing.
//!
//! ## Usage
//!
//! ```sh
//! cheer_media_mirror collect
//! cheer_media_mirror fetch
//! ```

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use cheer_media_mirror::cli::{Cli, Commands};
use cheer_media_mirror::fetcher::{self, OutputDirs};
use cheer_media_mirror::{collector, models::RunSummary};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("cheer_media_mirror starting up");

    let args = Cli::parse();
    debug!(?args.command, "Parsed CLI arguments");

    match args.command {
        Commands::Collect { manifest } => {
            let scraped = collector::collect(collector::PAGES).await;
            collector::write_manifest(&scraped, &manifest).await?;
            info!(
                pages = scraped.len(),
                path = %manifest.display(),
                "Collect stage complete"
            );
        }
        Commands::Fetch {
            manifest,
            tsv_dir,
            instagram_dir,
        } => {
            let dirs = OutputDirs {
                tsv: tsv_dir,
                instagram: instagram_dir,
            };
            let RunSummary { downloaded, failed } = fetcher::run(&manifest, &dirs).await?;
            info!(downloaded, failed, "Fetch stage complete");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
