// src/cache/mod.rs
// =============================================================================
// Key-value storage for compiled posts.
//
// Entries are keyed by (slug, revision). The revision comes from the
// content itself, so an entry is never updated: new content means a new
// key, and the old entry is simply never asked for again. Nothing here
// evicts.
//
// Two stores:
// - DiskStore: one JSON file per entry in a directory
// - MemoryStore: a map that lives as long as the process
// =============================================================================

mod disk;
mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use std::fmt;

use async_trait::async_trait;
use url::form_urlencoded;

use crate::error::Result;

/// Identifies one compiled revision of one post.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub slug: String,
    pub revision: String,
}

impl CacheKey {
    pub fn new(slug: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            revision: revision.into(),
        }
    }

    /// The key as a single file name, e.g. "hello-3a4b5c.json".
    ///
    /// Both halves are percent-encoded, so a key never escapes the cache
    /// dir and two different keys never share a file. The revision also
    /// encodes '-', which makes the last '-' the separator.
    pub fn file_name(&self) -> String {
        let slug = encode(&self.slug);
        let revision = encode(&self.revision).replace('-', "%2D");
        format!("{slug}-{revision}.json")
    }
}

// Leaves [A-Za-z0-9*-._] alone; everything else becomes %XX (space is '+')
fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Persistence for serialized posts. Last write wins; writers never need
/// to coordinate because every valid write for a key has the same content.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn has(&self, key: &CacheKey) -> Result<bool>;
    async fn read(&self, key: &CacheKey) -> Result<Vec<u8>>;
    async fn write(&self, key: &CacheKey, bytes: Vec<u8>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(CacheKey::new("hello", "abc123").file_name(), "hello-abc123.json");
    }

    #[test]
    fn test_file_name_cannot_escape_directory() {
        let key = CacheKey::new("../etc", "a/b");
        assert_eq!(key.file_name(), "..%2Fetc-a%2Fb.json");
        assert!(!key.file_name().contains('/'));
        assert!(!CacheKey::new("c:\\x", "1").file_name().contains(['\\', ':']));
    }

    #[test]
    fn test_distinct_keys_get_distinct_files() {
        let pairs = [
            (CacheKey::new("a:b", "1"), CacheKey::new("a_b", "1")),
            (CacheKey::new("a/b", "1"), CacheKey::new("a%2Fb", "1")),
            (CacheKey::new("a-b", "c"), CacheKey::new("a", "b-c")),
        ];
        for (left, right) in pairs {
            assert_ne!(left.file_name(), right.file_name(), "{left:?} vs {right:?}");
        }
        // dashes in slugs stay readable
        assert_eq!(CacheKey::new("my-post", "abc").file_name(), "my-post-abc.json");
    }
}
