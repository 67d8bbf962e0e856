// src/blog/post.rs
// =============================================================================
// get_post: one compiled post, compiled at most once per revision.
//
// Steps:
// 1. Resolve the post directory's revision (one listing call)
// 2. Cache hit for (slug, revision)? Return it. No download, no compile.
// 3. Otherwise download the whole directory, compile, store, return.
//
// Only a fully successful compile is written. Two requests racing on a
// brand new revision may both compile and both write; the bytes are the
// same either way, so whoever writes last doesn't matter.
// =============================================================================

use tracing::{debug, info, instrument, warn};

use super::Blog;
use crate::cache::CacheKey;
use crate::error::{BlogError, Result};
use crate::github::Revision;
use crate::model::Post;

impl Blog {
    #[instrument(skip(self))]
    pub async fn get_post(&self, slug: &str) -> Result<Post> {
        let revision = self.revision(slug).await?;

        let key = match &revision {
            Revision::Known(token) => Some(CacheKey::new(slug, token.as_str())),
            Revision::Unknown => {
                warn!(slug, "revision unknown, compiling without the cache");
                None
            }
        };

        if let Some(key) = &key {
            if let Some(post) = self.cached(key).await? {
                debug!(%key, "cache hit");
                return Ok(post);
            }
        }

        let post = self.compile(slug).await?;

        if let Some(key) = &key {
            let bytes = serde_json::to_vec(&post).map_err(|source| BlogError::Serialize {
                slug: slug.to_string(),
                source,
            })?;
            self.cache.write(key, bytes).await?;
            info!(%key, "cached compiled post");
        }

        Ok(post)
    }

    // A stored entry that no longer deserializes counts as a miss; the
    // fresh compile overwrites it.
    async fn cached(&self, key: &CacheKey) -> Result<Option<Post>> {
        if !self.cache.has(key).await? {
            return Ok(None);
        }
        let bytes = self.cache.read(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(post) => Ok(Some(post)),
            Err(err) => {
                warn!(%key, error = %err, "discarding unreadable cache entry");
                Ok(None)
            }
        }
    }

    async fn compile(&self, slug: &str) -> Result<Post> {
        let files = self.download(slug).await?;
        debug!(slug, files = files.len(), "compiling");

        let compiled = self
            .compiler
            .compile(slug, &files)
            .await
            .map_err(|source| BlogError::Compile {
                slug: slug.to_string(),
                source,
            })?;

        Ok(Post {
            slug: slug.to_string(),
            code: compiled.code,
            frontmatter: compiled.frontmatter,
        })
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `if let Some(key) = &key`?
//    - `key` is an Option<CacheKey>; borrowing it with & lets us use it
//      twice (read check, then write) without cloning
//
// 2. What does map_err(|source| BlogError::Compile { .. }) do?
//    - Converts the compiler's anyhow::Error into our own error type
//    - The original error is kept as `source`, so `{:#}` still prints it
//
// 3. Why serde_json::to_vec instead of to_string?
//    - The cache stores bytes; to_vec skips the String step
// -----------------------------------------------------------------------------
