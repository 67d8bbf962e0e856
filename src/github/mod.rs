// src/github/mod.rs
// =============================================================================
// This module talks to the repository that holds the blog content.
//
// Pieces:
// - RemoteTree: the two read-only operations everything else needs
//   (list a directory, fetch a blob by sha)
// - client: RemoteTree over the GitHub REST API
// - download: recursive, concurrent download of a whole directory
// - revision: turns a directory's sha into a cache revision token
//
// The rest of the app only sees the RemoteTree trait, so tests can swap in
// an in-memory tree without any HTTP at all.
//
// Rust concepts:
// - Traits: shared behaviour behind an interface (like a Java interface)
// - async-trait: lets a trait declare async methods that work with dyn
// =============================================================================

mod client;
mod download;
mod revision;

#[cfg(test)]
pub(crate) mod fake;

pub use client::GitHubClient;
pub use download::download_directory;
pub use revision::{resolve_revision, Revision};

use async_trait::async_trait;

use crate::error::Result;

/// What kind of thing a directory entry is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Anything else the API reports (symlink, submodule). Kept raw so the
    /// error can say what was found.
    Other(String),
}

impl From<&str> for EntryKind {
    fn from(kind: &str) -> Self {
        match kind {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            other => EntryKind::Other(other.to_string()),
        }
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Full path from the repository root.
    pub path: String,
    pub kind: EntryKind,
    /// Content-addressed identifier (git sha). For directories it changes
    /// whenever anything underneath changes.
    pub content_id: String,
}

/// Read-only access to a remote tree of files.
///
/// Both operations are idempotent and safe to retry.
#[async_trait]
pub trait RemoteTree: Send + Sync {
    /// Lists the direct children of `path`.
    async fn list_directory(&self, path: &str) -> Result<Vec<Entry>>;

    /// Fetches a blob's bytes, transfer encoding already removed.
    async fn fetch_blob(&self, content_id: &str) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_from_api_type() {
        assert_eq!(EntryKind::from("file"), EntryKind::File);
        assert_eq!(EntryKind::from("dir"), EntryKind::Dir);
        assert_eq!(
            EntryKind::from("submodule"),
            EntryKind::Other("submodule".to_string())
        );
    }
}
