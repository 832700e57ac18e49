//! orbitscan - camera-to-point-cloud capture and reconstruction CLI
//!
//! Subcommands:
//! - `orbitscan scan` - capture a session, trim it, reconstruct, open the viewer
//! - `orbitscan capture` - capture and trim a new session only
//! - `orbitscan trim <dir>` - evenly subsample an image directory in place
//! - `orbitscan reconstruct <image-dir>` - run the toolchain over existing images
//! - `orbitscan view <artifact>` - open a fused artifact in the viewer

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use orbitscan::capture::collector::run_capture;
use orbitscan::capture::http::MjpegStream;
use orbitscan::collection::session::Session;
use orbitscan::collection::store::ImageCollection;
use orbitscan::collection::trim::trim;
use orbitscan::config::ScanConfig;
use orbitscan::preprocess::FramePreprocessor;
use orbitscan::reconstruct::orchestrator::Reconstructor;
use orbitscan::viewer;

#[derive(Parser)]
#[command(name = "orbitscan")]
#[command(about = "Camera-to-point-cloud capture and reconstruction pipeline")]
#[command(version)]
struct Cli {
    /// Config file (JSON); defaults apply when absent
    #[arg(short, long, default_value = "orbitscan.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a session, trim it, reconstruct, and open the result
    Scan {
        /// MJPEG feed URL (e.g. http://192.168.0.2:4747/videofeed)
        #[arg(long)]
        url: Option<String>,
    },

    /// Capture and trim a new image session without reconstructing
    Capture {
        /// MJPEG feed URL, overrides the config
        #[arg(long)]
        url: Option<String>,
    },

    /// Evenly subsample an image directory in place
    Trim {
        dir: PathBuf,

        /// Maximum number of files to retain (at least 2)
        #[arg(short, long, default_value_t = 200)]
        max: usize,
    },

    /// Run the reconstruction toolchain over an existing image directory
    Reconstruct { image_dir: PathBuf },

    /// Open a fused artifact in the external viewer
    View { artifact: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ScanConfig::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Scan { url } => {
            let image_dir = capture_session(&config, url).await?;
            let artifact = Reconstructor::with_colmap(config.reconstruction.clone())
                .reconstruct(&image_dir)
                .await?;
            viewer::open(&config.viewer_binary, &artifact).context("launching viewer")?;
        }
        Commands::Capture { url } => {
            let image_dir = capture_session(&config, url).await?;
            info!("session images at {}", image_dir.display());
        }
        Commands::Trim { dir, max } => {
            let deleted = trim(&dir, max)?;
            info!("deleted {deleted} files");
        }
        Commands::Reconstruct { image_dir } => {
            let artifact = Reconstructor::with_colmap(config.reconstruction.clone())
                .reconstruct(&image_dir)
                .await?;
            println!("{}", artifact.display());
        }
        Commands::View { artifact } => {
            viewer::open(&config.viewer_binary, &artifact).context("launching viewer")?;
        }
    }

    Ok(())
}

/// Capture frames until Ctrl-C or end-of-stream, then trim the collection.
///
/// Returns the session's image directory.
async fn capture_session(config: &ScanConfig, url: Option<String>) -> Result<PathBuf> {
    let Some(url) = url.or_else(|| config.camera_url.clone()) else {
        bail!("no camera URL: pass --url or set camera_url in the config");
    };

    let session = Session::create(&config.workspace)?;
    info!("session {} at {}", session.id(), session.root().display());

    let preprocessor = FramePreprocessor::new(
        config.capture.target_width,
        config.capture.target_height,
        config.capture.jpeg_quality,
    );
    let mut collection = ImageCollection::new(&session, preprocessor);
    let image_dir = collection.image_dir()?.to_path_buf();

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, finishing current frame");
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    info!("collecting from {url} (Ctrl-C to stop)");
    let summary = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut source = MjpegStream::open(&url)?;
        Ok(run_capture(&mut source, &mut collection, &stop)?)
    })
    .await
    .context("capture task panicked")??;

    info!(
        "captured {} frames ({} dropped, {:.1} fps)",
        summary.accepted, summary.dropped, summary.fps
    );

    let deleted = trim(&image_dir, config.max_collection)?;
    if deleted > 0 {
        info!("trimmed {deleted} excess frames");
    }
    Ok(image_dir)
}
