use std::path::PathBuf;

use thiserror::Error;

use crate::preprocess::PreprocessError;

/// Collection subsystem errors.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("session directory already exists: {}", .0.display())]
    SessionExists(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("trim bound must be at least 2, got {0}")]
    InvalidBound(usize),

    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    #[error("collection I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CollectionError>;
