//! Checkpoint persistence.
//!
//! Epistemic foundation:
//! - K_i: The checkpoint holds the id of the last row confirmed updated remotely
//! - K_i: The file is replaced atomically (write-then-rename)
//! - B_i: Checkpoint file may not exist or be blank → Option

use crate::models::{Result, UpdaterError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plain-text checkpoint file holding a single identifier.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
    temp_path: PathBuf,
}

impl CheckpointStore {
    /// Create a store for the given file. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);
        Self { path, temp_path }
    }

    /// Read the last processed identifier.
    ///
    /// Returns `None` when the file is missing or holds only whitespace.
    pub fn read(&self) -> Result<Option<String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(UpdaterError::io("reading checkpoint", e)),
        };

        let id = content.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    /// Replace the checkpoint with `id`.
    pub fn write(&self, id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| UpdaterError::io("creating checkpoint dir", e))?;
        }

        fs::write(&self.temp_path, id)
            .map_err(|e| UpdaterError::io("writing temp checkpoint", e))?;
        fs::rename(&self.temp_path, &self.path)
            .map_err(|e| UpdaterError::io("renaming checkpoint", e))?;

        debug!(id, path = %self.path.display(), "Checkpoint saved");
        Ok(())
    }

    /// Path of the checkpoint file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
