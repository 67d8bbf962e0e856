// src/error.rs
// =============================================================================
// Error types for the fetch / compile / cache core.
//
// The binary uses anyhow at the command boundary, but everything below it
// returns BlogError so callers can tell a missing post (NotFound) from a
// flaky network (Transport) from a broken document (Frontmatter, Compile).
//
// Every variant carries the remote resource (path or blob sha) or the slug
// it failed on, so a failed `post` command says WHICH file broke.
//
// Rust concepts:
// - thiserror: derive macro that writes Display and Error impls for us
// - #[source]: links an error to the lower-level error that caused it
// =============================================================================

use thiserror::Error;

/// Boxed lower-level cause for transport failures (reqwest errors, or a
/// plain message when the upstream answered with a bad status).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BlogError {
    /// The path or blob does not exist upstream.
    #[error("`{resource}` was not found upstream")]
    NotFound { resource: String },

    /// Network or API failure. Not retried here.
    #[error("request for `{resource}` failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: BoxError,
    },

    /// A directory listing was requested but the path names a single file.
    #[error("`{path}` is not a directory")]
    NotADirectory { path: String },

    /// A listed entry is neither a file nor a directory (symlink, submodule).
    #[error("unexpected entry type `{kind}` at `{path}`")]
    UnexpectedEntryType { path: String, kind: String },

    /// Blob content could not be turned back into bytes.
    #[error("could not decode `{resource}`: {detail}")]
    Decode { resource: String, detail: String },

    #[error("invalid front-matter in `{path}`")]
    Frontmatter {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The compiler failed for this post. Nothing is cached.
    #[error("failed to compile post `{slug}`")]
    Compile {
        slug: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cache entry `{key}` could not be accessed")]
    Cache {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize post `{slug}`")]
    Serialize {
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BlogError {
    pub fn transport(resource: impl Into<String>, source: impl Into<BoxError>) -> Self {
        BlogError::Transport {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        BlogError::NotFound {
            resource: resource.into(),
        }
    }
}

pub type Result<T, E = BlogError> = std::result::Result<T, E>;
