// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Connection settings (owner, repo, content path, cache dir, API url) are
// global flags, and each one falls back to an environment variable, so a
// deployment can set BLOG_GITHUB_OWNER etc. once and just run
// `postcache posts`.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - #[command(flatten)]: reuse a group of arguments inside another struct
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;

use crate::config::{Config, DEFAULT_API_URL, DEFAULT_CONTENT_PATH, DEFAULT_LISTING_CONCURRENCY};
use crate::telemetry::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "postcache",
    version,
    about = "Fetch, compile and cache blog posts stored in a GitHub repository",
    long_about = "postcache reads Markdown/MDX posts from a directory in a GitHub repository. \
                  Compiled posts are cached by the content's git revision, so a post is only \
                  downloaded and compiled again after it actually changes."
)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Log output format (logs go to stderr; level via RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the content lives and where compiled posts are kept.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Repository owner
    #[arg(long, global = true, env = "BLOG_GITHUB_OWNER", default_value = "")]
    pub owner: String,

    /// Repository name
    #[arg(long, global = true, env = "BLOG_GITHUB_REPO", default_value = "")]
    pub repo: String,

    /// Directory in the repository holding one folder per post
    #[arg(long, global = true, env = "BLOG_GITHUB_PATH", default_value = DEFAULT_CONTENT_PATH)]
    pub content_path: String,

    /// Directory for compiled posts; without it the cache lives in memory
    #[arg(long, global = true, env = "CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// GitHub API base URL (GitHub Enterprise: https://host/api/v3)
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: Url,

    /// How many post folders `posts` inspects at once
    #[arg(long, global = true, env = "BLOG_LISTING_CONCURRENCY", default_value_t = DEFAULT_LISTING_CONCURRENCY)]
    pub listing_concurrency: usize,
}

impl SourceArgs {
    pub fn into_config(self) -> Config {
        Config {
            owner: self.owner,
            repo: self.repo,
            content_path: self.content_path,
            cache_dir: self.cache_dir,
            api_url: self.api_url,
            listing_concurrency: self.listing_concurrency,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all posts, newest first
    ///
    /// Example: postcache posts --json
    Posts {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Compile one post (or serve it from the cache)
    ///
    /// Example: postcache post 2010s-decade-in-review --json
    Post {
        /// The post's folder name
        slug: String,

        /// Output the whole compiled post as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the current revision token of a post
    Revision {
        slug: String,
    },

    /// Download every file of a post into a local directory
    ///
    /// Example: postcache download hello --out ./hello
    Download {
        slug: String,

        /// Target directory (created if missing)
        #[arg(long)]
        out: PathBuf,
    },
}
