//! File-based cache implementation.
//!
//! [`FileCache`] stores each entry as a plain file holding the raw payload:
//!
//! ```text
//! {dir}/
//! +-- 3f1a...e9.svg      # entry for key "3f1a...e9"
//! +-- 77c0...04.svg
//! ```
//!
//! The directory is created lazily on the first write. Entries are written
//! to a temporary file in the same directory and renamed into place, so a
//! reader never sees a partial payload. There is no version file and no
//! eviction: entries survive across runs until removed by hand.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::CacheBucket;

/// File-based [`CacheBucket`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    extension: String,
}

impl FileCache {
    /// Create a cache storing `<key>.<extension>` files under `dir`.
    ///
    /// Nothing is touched on disk until the first [`set`](CacheBucket::set).
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Directory holding the cache entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{}", self.extension))
    }
}

impl CacheBucket for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(data) => Some(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value)?;
        tmp.persist(self.entry_path(key)).map_err(|e| e.error)?;
        Ok(())
    }
}
