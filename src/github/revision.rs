// src/github/revision.rs
// =============================================================================
// Revision tokens: a string that changes exactly when a path's content does.
//
// GitHub has no endpoint that returns the tree sha of a single directory,
// so we list the PARENT directory and pick our entry out of it. A git tree
// sha changes whenever any file below it changes, which is the property we
// want for a cache key (timestamps would be fooled by clock skew).
//
// Some backends send ids shaped like "content/blog/foo|167234"; only the
// part after the last '|' is the token.
// =============================================================================

use std::fmt;

use tracing::debug;

use super::RemoteTree;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Revision {
    Known(String),
    /// The path was missing from its parent's listing. Usually a race with
    /// a concurrent change; callers keep going without the cache.
    Unknown,
}

impl Revision {
    pub fn token(&self) -> Option<&str> {
        match self {
            Revision::Known(token) => Some(token),
            Revision::Unknown => None,
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::Known(token) => f.write_str(token),
            Revision::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// Strips a backend-specific "identifier|" prefix from a raw content id.
///
/// Everything up to the LAST '|' goes, so "a|b|c" gives "c". Taking the
/// second field instead would give "b"; ids with more than one '|' have
/// not been seen from any backend, and the last field is the one that
/// changes with content.
pub fn normalize_token(raw: &str) -> &str {
    match raw.rsplit_once('|') {
        Some((_, token)) => token,
        None => raw,
    }
}

/// Resolves the current revision of `path`.
///
/// Errors listing the parent propagate; a missing entry is `Unknown`.
pub async fn resolve_revision<T>(tree: &T, path: &str) -> Result<Revision>
where
    T: RemoteTree + ?Sized,
{
    let path = path.trim_end_matches('/');
    let parent = path.rsplit_once('/').map_or("", |(parent, _)| parent);

    let entries = tree.list_directory(parent).await?;
    let revision = entries
        .iter()
        .find(|entry| entry.path == path)
        .map(|entry| normalize_token(&entry.content_id))
        .filter(|token| !token.is_empty())
        .map_or(Revision::Unknown, |token| Revision::Known(token.to_string()));

    debug!(path, %revision, "resolved revision");
    Ok(revision)
}
