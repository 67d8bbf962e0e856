// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments (and env fallbacks) using clap
// 2. Build the Blog service: GitHub client + compiler + cache store
// 3. Dispatch to the subcommand handler and print its result
// 4. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - async/await: the content repository is read with many concurrent requests
// - Arc<dyn Trait>: the Blog service only knows traits, main picks the
//   concrete GitHub client / compiler / store
// - anyhow::Context: adds "what were we doing" to errors from below
// =============================================================================

mod blog;
mod cache;
mod cli;
mod config;
mod content;
mod error;
mod github;
mod model;
mod telemetry;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use blog::Blog;
use cache::{CacheStore, DiskStore, MemoryStore};
use cli::{Cli, Commands};
use config::Config;
use content::MarkdownCompiler;
use github::GitHubClient;
use model::{Post, PostFile, PostListing};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole chain: "failed to compile post `x`: no index ..."
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format)?;

    let config = cli.source.into_config();
    config.validate()?;
    let blog = build_blog(config)?;

    match cli.command {
        Commands::Posts { json } => handle_posts(&blog, json).await,
        Commands::Post { slug, json } => handle_post(&blog, &slug, json).await,
        Commands::Revision { slug } => handle_revision(&blog, &slug).await,
        Commands::Download { slug, out } => handle_download(&blog, &slug, &out).await,
    }
}

fn build_blog(config: Config) -> Result<Blog> {
    let tree = Arc::new(GitHubClient::new(&config)?);

    let cache: Arc<dyn CacheStore> = match &config.cache_dir {
        Some(dir) => {
            let store = DiskStore::new(dir);
            info!(dir = %store.dir().display(), "using disk cache");
            Arc::new(store)
        }
        None => Arc::new(MemoryStore::new()),
    };

    Ok(Blog::new(config, tree, Arc::new(MarkdownCompiler), cache))
}

// Handles the 'posts' subcommand
async fn handle_posts(blog: &Blog, json: bool) -> Result<()> {
    let posts = blog.get_posts().await.context("failed to list posts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print_table(&posts);
    }
    Ok(())
}

// Handles the 'post' subcommand
async fn handle_post(blog: &Blog, slug: &str, json: bool) -> Result<()> {
    let post = blog
        .get_post(slug)
        .await
        .with_context(|| format!("failed to load post `{slug}`"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&post)?);
    } else {
        print_summary(&post);
    }
    Ok(())
}

async fn handle_revision(blog: &Blog, slug: &str) -> Result<()> {
    let revision = blog.revision(slug).await?;
    match revision.token() {
        Some(token) => println!("{}", token),
        None => anyhow::bail!("no revision found for `{slug}`"),
    }
    Ok(())
}

// Handles the 'download' subcommand: mirrors the post folder to `out`
async fn handle_download(blog: &Blog, slug: &str, out: &Path) -> Result<()> {
    let files = blog
        .download(slug)
        .await
        .with_context(|| format!("failed to download post `{slug}`"))?;

    for file in &files {
        write_file(out, file).await?;
    }

    println!("📥 Downloaded {} file(s) to {}", files.len(), out.display());
    Ok(())
}

async fn write_file(out: &Path, file: &PostFile) -> Result<()> {
    // Paths come from the remote listing; refuse anything that climbs out
    if file.path.split('/').any(|piece| piece == ".." || piece.is_empty()) {
        anyhow::bail!("refusing to write suspicious path `{}`", file.path);
    }

    let target = out.join(&file.path);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&target, &file.content)
        .await
        .with_context(|| format!("failed to write {}", target.display()))
}

// Prints the listing as a human-readable table in the terminal
fn print_table(posts: &[PostListing]) {
    println!("{:<40} {:<12} {:<50}", "SLUG", "PUBLISHED", "TITLE");
    println!("{}", "=".repeat(102));

    for post in posts {
        let published = post.frontmatter.published.as_deref().unwrap_or("-");
        let title = post.frontmatter.title.as_deref().unwrap_or("");
        println!("{:<40} {:<12} {:<50}", truncate(&post.slug, 40), published, title);
    }

    println!();
    println!("📋 Total: {}", posts.len());
}

fn print_summary(post: &Post) {
    println!("📝 {}", post.frontmatter.title.as_deref().unwrap_or(&post.slug));
    if let Some(published) = &post.frontmatter.published {
        println!("   Published: {}", published);
    }
    if !post.frontmatter.tags.is_empty() {
        println!("   Tags: {}", post.frontmatter.tags.join(", "));
    }
    println!("   Compiled size: {} bytes", post.code.len());
}

// Shortens long slugs so the table columns stay aligned
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
