//! Storage backends for rendered textures.
//!
//! The cache only needs three things from a backend: whether an object
//! exists, an atomic write, and where an object lives. Anything that can
//! provide those (a directory, an object store) can sit behind the cache.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub trait TextureStore: Send + Sync {
    /// Whether a complete object named `name` exists
    fn contains(&self, name: &str) -> bool;

    /// Store `bytes` under `name`
    ///
    /// Must be atomic: readers see either nothing or the complete object,
    /// and a failed write leaves no object behind.
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Location of `name`, whether or not it exists yet
    fn locate(&self, name: &str) -> PathBuf;
}

/// Stores textures as files in a single directory
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StorageError::CreateDir {
            path: root.clone(),
            source,
        })?;
        Ok(FsStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextureStore for FsStore {
    fn contains(&self, name: &str) -> bool {
        self.locate(name).is_file()
    }

    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let write_err = |source: std::io::Error| StorageError::Write {
            name: name.to_string(),
            source,
        };

        // Stage next to the target so the final rename stays on one filesystem
        let mut staged = tempfile::NamedTempFile::new_in(&self.root).map_err(write_err)?;
        staged.write_all(bytes).map_err(write_err)?;
        staged.as_file().sync_all().map_err(write_err)?;
        staged
            .persist(self.locate(name))
            .map_err(|e| write_err(e.error))?;

        log::debug!("Wrote {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}
