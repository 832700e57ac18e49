use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ReconstructionSettings;
use crate::reconstruct::error::{ReconstructError, Result};

pub const DATABASE_FILE_NAME: &str = "database.db";
pub const SPARSE_DIR_NAME: &str = "sparse";
pub const DENSE_DIR_NAME: &str = "dense";
pub const STEREO_DIR_NAME: &str = "stereo";
pub const FUSED_FILE_NAME: &str = "fused.ply";

/// One step of the six-stage reconstruction toolchain, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FeatureExtraction,
    SequentialMatching,
    SparseMapping,
    Undistortion,
    DenseStereo,
    StereoFusion,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::FeatureExtraction,
        Stage::SequentialMatching,
        Stage::SparseMapping,
        Stage::Undistortion,
        Stage::DenseStereo,
        Stage::StereoFusion,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::FeatureExtraction => "feature-extraction",
            Stage::SequentialMatching => "sequential-matching",
            Stage::SparseMapping => "sparse-mapping",
            Stage::Undistortion => "undistortion",
            Stage::DenseStereo => "dense-stereo",
            Stage::StereoFusion => "stereo-fusion",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved paths of one session's reconstruction workspace.
///
/// Layout (bit-compatible with existing sessions):
/// ```text
/// <session>/
///     images/           input frames (read-only here)
///     database.db       feature/match database
///     sparse/0/         sparse model
///     dense/            undistorted images, stereo/ depth maps
///     dense/fused.ply   final fused artifact
/// ```
#[derive(Debug, Clone)]
pub struct SessionLayout {
    pub image_dir: PathBuf,
    pub database: PathBuf,
    pub sparse_dir: PathBuf,
    pub sparse_model_dir: PathBuf,
    pub dense_dir: PathBuf,
    pub stereo_dir: PathBuf,
    pub fused: PathBuf,
}

impl SessionLayout {
    /// Derive the workspace layout from a session's image directory.
    pub fn for_image_dir(image_dir: &Path) -> Result<Self> {
        let root = image_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| ReconstructError::BadImageDir(image_dir.to_path_buf()))?;

        let sparse_dir = root.join(SPARSE_DIR_NAME);
        let dense_dir = root.join(DENSE_DIR_NAME);
        Ok(Self {
            image_dir: image_dir.to_path_buf(),
            database: root.join(DATABASE_FILE_NAME),
            sparse_model_dir: sparse_dir.join("0"),
            stereo_dir: dense_dir.join(STEREO_DIR_NAME),
            fused: dense_dir.join(FUSED_FILE_NAME),
            sparse_dir,
            dense_dir,
        })
    }
}

/// A fully resolved external-process invocation for one stage.
#[derive(Debug, Clone)]
pub struct StageCommand {
    pub stage: Stage,
    pub program: String,
    pub args: Vec<OsString>,
}

impl StageCommand {
    /// Build the invocation for `stage` against a session layout.
    ///
    /// The argument contract is fixed: COLMAP observes only these flags plus
    /// the filesystem, never structured output.
    pub fn build(stage: Stage, layout: &SessionLayout, settings: &ReconstructionSettings) -> Self {
        let mut args = Args::default();
        match stage {
            Stage::FeatureExtraction => {
                args.push("feature_extractor");
                args.push("--database_path");
                args.push(&layout.database);
                args.push("--image_path");
                args.push(&layout.image_dir);
                args.push("--ImageReader.single_camera");
                args.push("1");
                args.push("--SiftExtraction.max_num_features");
                args.push(settings.max_num_features.to_string());
            }
            Stage::SequentialMatching => {
                args.push("sequential_matcher");
                args.push("--database_path");
                args.push(&layout.database);
                args.push("--SequentialMatching.overlap");
                args.push(settings.overlap_window.to_string());
            }
            Stage::SparseMapping => {
                args.push("mapper");
                args.push("--database_path");
                args.push(&layout.database);
                args.push("--image_path");
                args.push(&layout.image_dir);
                args.push("--output_path");
                args.push(&layout.sparse_dir);
                args.push("--Mapper.min_num_matches");
                args.push(settings.min_num_matches.to_string());
            }
            Stage::Undistortion => {
                args.push("image_undistorter");
                args.push("--image_path");
                args.push(&layout.image_dir);
                args.push("--input_path");
                args.push(&layout.sparse_model_dir);
                args.push("--output_path");
                args.push(&layout.dense_dir);
                args.push("--output_type");
                args.push("COLMAP");
            }
            Stage::DenseStereo => {
                args.push("patch_match_stereo");
                args.push("--workspace_path");
                args.push(&layout.dense_dir);
                args.push("--workspace_format");
                args.push("COLMAP");
                args.push("--PatchMatchStereo.geom_consistency");
                args.push("true");
            }
            Stage::StereoFusion => {
                args.push("stereo_fusion");
                args.push("--workspace_path");
                args.push(&layout.dense_dir);
                args.push("--workspace_format");
                args.push("COLMAP");
                args.push("--input_type");
                args.push("geometric");
                args.push("--output_path");
                args.push(&layout.fused);
            }
        }
        Self {
            stage,
            program: settings.colmap_binary.clone(),
            args: args.0,
        }
    }
}

#[derive(Default)]
struct Args(Vec<OsString>);

impl Args {
    fn push(&mut self, arg: impl AsRef<OsStr>) {
        self.0.push(arg.as_ref().to_os_string());
    }
}
