// src/cache/disk.rs
// =============================================================================
// CacheStore backed by a directory of JSON files.
//
// Writes go to a temp file in the same directory and are then renamed over
// the final name. Rename is atomic on the same filesystem, so a reader
// sees either no entry or a complete one, even when two requests compile
// the same new revision at once.
// =============================================================================

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{CacheKey, CacheStore};
use crate::error::{BlogError, Result};

#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// The directory is created on the first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

fn cache_error(key: &CacheKey, source: io::Error) -> BlogError {
    BlogError::Cache {
        key: key.to_string(),
        source,
    }
}

// Blocking part of a write: temp file + fsync-free rename
fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn has(&self, key: &CacheKey) -> Result<bool> {
        tokio::fs::try_exists(self.entry_path(key))
            .await
            .map_err(|e| cache_error(key, e))
    }

    async fn read(&self, key: &CacheKey) -> Result<Vec<u8>> {
        tokio::fs::read(self.entry_path(key))
            .await
            .map_err(|e| cache_error(key, e))
    }

    async fn write(&self, key: &CacheKey, bytes: Vec<u8>) -> Result<()> {
        let dir = self.dir.clone();
        let target = self.entry_path(key);
        debug!(path = %target.display(), size = bytes.len(), "writing cache entry");

        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &bytes))
            .await
            .map_err(|e| cache_error(key, io::Error::new(io::ErrorKind::Other, e)))?
            .map_err(|e| cache_error(key, e))
    }
}
