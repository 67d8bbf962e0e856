// src/model.rs
// =============================================================================
// The data the pipeline passes around.
//
// - PostFile: one leaf file of a post directory, path relative to that dir
// - PostIndexFile: the post's index document plus the slug it belongs to
// - PostListing: lightweight listing row (slug + front-matter)
// - Post: the compiled artifact that gets cached
//
// Post and PostListing derive Serialize/Deserialize: Post is what we write
// to the cache store, and both are printed with --json.
// =============================================================================

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::content::Frontmatter;

/// A single file downloaded from a post directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFile {
    /// Path relative to the directory that was downloaded, '/' separated.
    pub path: String,
    /// Raw bytes. Posts can carry binary assets (images), so no UTF-8
    /// requirement here.
    pub content: Vec<u8>,
}

impl PostFile {
    /// Text view of the content; invalid UTF-8 is replaced, not rejected.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// The index document (index.md / index.mdx) of one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostIndexFile {
    pub slug: String,
    pub file: PostFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListing {
    pub slug: String,
    pub frontmatter: Frontmatter,
}

/// A compiled post. Immutable once built: new content means a new revision
/// and therefore a new cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub code: String,
    pub frontmatter: Frontmatter,
}
