use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::reconstruct::stage::Stage;

/// Reconstruction pipeline errors, identified by the failing stage.
#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error("{stage} failed to start: {source}")]
    Spawn {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} exited with {status}")]
    StageFailed { stage: Stage, status: ExitStatus },

    #[error("{stage} timed out after {timeout_secs}s")]
    Timeout { stage: Stage, timeout_secs: u64 },

    #[error("{stage} produced no output at {}", .path.display())]
    OutputMissing { stage: Stage, path: PathBuf },

    #[error("image directory has no parent session: {}", .0.display())]
    BadImageDir(PathBuf),

    #[error("reconstruction I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconstructError {
    /// The stage this error happened in, when attributable to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ReconstructError::Spawn { stage, .. }
            | ReconstructError::StageFailed { stage, .. }
            | ReconstructError::Timeout { stage, .. }
            | ReconstructError::OutputMissing { stage, .. } => Some(*stage),
            ReconstructError::BadImageDir(_) | ReconstructError::Io(_) => None,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, ReconstructError>;
