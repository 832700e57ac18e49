use thiserror::Error;

use crate::collection::error::CollectionError;

/// Capture subsystem errors.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("could not open capture source: {0}")]
    Open(String),

    #[error("failed to read from capture source: {0}")]
    Read(String),

    #[error("malformed frame in stream: {0}")]
    MalformedFrame(String),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CaptureError>;
