use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::config::ReconstructionSettings;
use crate::reconstruct::error::{ReconstructError, Result};
use crate::reconstruct::runner::{ColmapRunner, ProcessRunner};
use crate::reconstruct::stage::{SessionLayout, Stage, StageCommand};

/// Drives the six reconstruction stages over a session's image directory.
///
/// Stages run strictly in order, each awaited to completion, and each is
/// validated by the presence of its output artifact before the next one
/// starts — external toolchains can exit 0 on degenerate output, so exit
/// status alone is never trusted. Any failure aborts the run and leaves the
/// partial directory tree intact for inspection. No retry, no rollback.
pub struct Reconstructor {
    settings: ReconstructionSettings,
    runner: Box<dyn ProcessRunner>,
}

impl Reconstructor {
    /// Create an orchestrator with an explicit runner (tests inject mocks).
    pub fn new(settings: ReconstructionSettings, runner: Box<dyn ProcessRunner>) -> Self {
        Self { settings, runner }
    }

    /// Create an orchestrator that invokes real COLMAP processes.
    pub fn with_colmap(settings: ReconstructionSettings) -> Self {
        let runner = ColmapRunner::new(Duration::from_secs(settings.stage_timeout_secs));
        Self::new(settings, Box::new(runner))
    }

    /// Run the full toolchain. Returns the fused artifact path.
    ///
    /// The image directory is read-only input; all intermediate artifacts
    /// land in its parent session directory.
    pub async fn reconstruct(&self, image_dir: &Path) -> Result<PathBuf> {
        let layout = SessionLayout::for_image_dir(image_dir)?;
        fs::create_dir_all(&layout.sparse_dir)?;
        fs::create_dir_all(&layout.dense_dir)?;

        for stage in Stage::ALL {
            let command = StageCommand::build(stage, &layout, &self.settings);
            info!("running {stage}");
            self.runner.run(&command).await?;
            validate_stage(stage, &layout)?;
            info!("{stage} complete");
        }

        info!("fused artifact at {}", layout.fused.display());
        Ok(layout.fused)
    }
}

/// Check a completed stage's required output artifact.
///
/// Sequential matching writes back into the feature database, so the
/// database file itself is its artifact. The original toolchain script left
/// matching and dense stereo unvalidated; both are checked here.
fn validate_stage(stage: Stage, layout: &SessionLayout) -> Result<()> {
    let (ok, path) = match stage {
        Stage::FeatureExtraction | Stage::SequentialMatching => {
            (layout.database.is_file(), &layout.database)
        }
        Stage::SparseMapping => (dir_non_empty(&layout.sparse_dir), &layout.sparse_dir),
        Stage::Undistortion => (dir_non_empty(&layout.dense_dir), &layout.dense_dir),
        Stage::DenseStereo => (dir_non_empty(&layout.stereo_dir), &layout.stereo_dir),
        Stage::StereoFusion => (layout.fused.is_file(), &layout.fused),
    };

    if ok {
        Ok(())
    } else {
        Err(ReconstructError::OutputMissing {
            stage,
            path: path.clone(),
        })
    }
}

fn dir_non_empty(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
