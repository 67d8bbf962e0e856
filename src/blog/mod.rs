// src/blog/mod.rs
// =============================================================================
// The Blog service: what the CLI actually calls.
//
// It wires the pieces together:
// - a RemoteTree to read the content repository
// - a Compiler to turn a post's files into code
// - a CacheStore to remember compiled posts by (slug, revision)
//
// Operations live in their own files:
// - post.rs: get_post (revision check, cache, fetch + compile)
// - listing.rs: get_posts (front-matter of every post, newest first)
//
// Rust concepts:
// - Arc<dyn Trait>: shared ownership of "something implementing Trait",
//   so main can pick GitHub/disk while tests pick in-memory fakes
// =============================================================================

mod listing;
mod post;

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::content::Compiler;
use crate::error::Result;
use crate::github::{self, RemoteTree, Revision};
use crate::model::PostFile;

pub struct Blog {
    config: Config,
    tree: Arc<dyn RemoteTree>,
    compiler: Arc<dyn Compiler>,
    cache: Arc<dyn CacheStore>,
}

impl Blog {
    pub fn new(
        config: Config,
        tree: Arc<dyn RemoteTree>,
        compiler: Arc<dyn Compiler>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            config,
            tree,
            compiler,
            cache,
        }
    }

    /// Current revision of a post's directory.
    pub async fn revision(&self, slug: &str) -> Result<Revision> {
        github::resolve_revision(self.tree.as_ref(), &self.config.post_path(slug)).await
    }

    /// Every file of a post, paths relative to the post directory.
    pub async fn download(&self, slug: &str) -> Result<Vec<PostFile>> {
        github::download_directory(self.tree.as_ref(), &self.config.post_path(slug)).await
    }
}
