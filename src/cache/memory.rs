// In-process CacheStore, used when no cache directory is configured.

use std::collections::HashMap;
use std::io;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use super::{CacheKey, CacheStore};
use crate::error::{BlogError, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<CacheKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn has(&self, key: &CacheKey) -> Result<bool> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.contains_key(key))
    }

    async fn read(&self, key: &CacheKey) -> Result<Vec<u8>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned().ok_or_else(|| BlogError::Cache {
            key: key.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such cache entry"),
        })
    }

    async fn write(&self, key: &CacheKey, bytes: Vec<u8>) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), bytes);
        Ok(())
    }
}
