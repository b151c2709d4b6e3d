//! Advisory lock marker for the registry directory.
//!
//! A single `.LOCK` file at the directory root signals an in-progress write.
//! There is no blocking, no retry, and no ownership record: a writer that
//! finds the marker present backs off immediately, and release deletes the
//! marker unconditionally. The check-then-create is two separate filesystem
//! operations, so two writers can both observe "no lock" and both proceed;
//! a process that dies between create and release leaves the marker behind.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{info, warn};

use super::error::StoreError;

/// Name of the marker file under the registry root.
pub(crate) const LOCK_FILE_NAME: &str = ".LOCK";

/// Holds the marker for the duration of a write; deletes it on drop, so the
/// directory is released on every exit path, including panic unwind.
#[derive(Debug)]
pub(crate) struct LockFile {
    path: PathBuf,
}

impl LockFile {
    /// Claims the directory by creating the marker file.
    ///
    /// Fails with [`StoreError::LockContended`] if the marker already exists;
    /// the foreign marker is left untouched.
    pub(crate) fn acquire(root: &Path) -> Result<LockFile, StoreError> {
        let path = root.join(LOCK_FILE_NAME);
        if path.exists() {
            info!(
                "registry directory '{}' is currently being modified, try adding the entry later",
                root.display()
            );
            return Err(StoreError::LockContended(path));
        }

        info!("lock file is absent, locking directory before proceeding");
        File::create(&path).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(LockFile { path })
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        info!("deleting lock file, directory is writable");
        if let Err(e) = fs::remove_file(&self.path) {
            warn!("failed to remove lock file '{}': {e}", self.path.display());
        }
    }
}
