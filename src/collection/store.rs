use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::frame::Frame;
use crate::collection::error::Result;
use crate::collection::session::Session;
use crate::preprocess::FramePreprocessor;

const IMAGE_DIR_NAME: &str = "images";

/// On-disk image collection for one session.
///
/// Accepted frames are preprocessed and written to
/// `<session>/images/<index>.jpg` with a zero-based, monotonically
/// increasing index. The index is consumed on every accept call — including
/// ones that fail partway — so a path is never reused.
pub struct ImageCollection {
    image_dir: PathBuf,
    preprocessor: FramePreprocessor,
    next_index: u64,
}

impl ImageCollection {
    /// Create a collection rooted in the session's directory.
    pub fn new(session: &Session, preprocessor: FramePreprocessor) -> Self {
        Self {
            image_dir: session.root().join(IMAGE_DIR_NAME),
            preprocessor,
            next_index: 0,
        }
    }

    /// Return the image directory, creating it on first access.
    pub fn image_dir(&self) -> Result<&Path> {
        if !self.image_dir.exists() {
            fs::create_dir_all(&self.image_dir)?;
        }
        Ok(&self.image_dir)
    }

    /// Preprocess a frame and persist it under the next index.
    ///
    /// Returns the written path. The index advances even when this fails.
    pub fn accept(&mut self, frame: &Frame) -> Result<PathBuf> {
        let index = self.next_index;
        self.next_index += 1;

        let path = self.image_dir()?.join(format!("{index}.jpg"));
        let jpeg = self.preprocessor.process(frame)?;
        fs::write(&path, jpeg)?;
        Ok(path)
    }

    /// Number of indices assigned so far (accepted calls, failures included).
    pub fn assigned(&self) -> u64 {
        self.next_index
    }
}
