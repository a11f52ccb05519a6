use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the on-disk mirror tree for one crawl.
pub struct MirrorWriter {
    root: PathBuf,
}

impl MirrorWriter {
    /// Creates `<save_path>/<host_dir>/` if it does not exist yet.
    pub fn create(save_path: &Path, host_dir: &str) -> Result<Self> {
        let root = save_path.join(host_dir);
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes raw bytes at a relative path, creating parent directories as
    /// needed. Existing files are overwritten.
    pub fn save(&self, relative: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
