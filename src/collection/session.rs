use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::collection::error::{CollectionError, Result};

/// Session id format: fixed-width, zero-padded local timestamp.
const ID_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

/// One capture-to-reconstruction run.
///
/// A session exclusively owns `<workspace>/<id>/` from creation until
/// reconstruction finishes. Creation is exclusive: an existing directory for
/// the generated id is a hard error, never silently reused.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    root: PathBuf,
}

impl Session {
    /// Create a session named after the current local time.
    pub fn create(workspace: &Path) -> Result<Self> {
        let id = Local::now().format(ID_FORMAT).to_string();
        Self::create_with_id(workspace, &id)
    }

    /// Create a session with an explicit id. Fails if the session directory
    /// already exists.
    pub fn create_with_id(workspace: &Path, id: &str) -> Result<Self> {
        fs::create_dir_all(workspace)?;
        let root = workspace.join(id);
        match fs::create_dir(&root) {
            Ok(()) => Ok(Self {
                id: id.to_string(),
                root,
            }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(CollectionError::SessionExists(root))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Timestamp-derived session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root directory: `<workspace>/<id>/`.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
