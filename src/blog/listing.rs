// src/blog/listing.rs
// =============================================================================
// get_posts: the front-matter of every post, newest first.
//
// How it works:
// 1. List the content directory; every sub-directory is one post
// 2. For each post (several at once): list it, pick the index document,
//    fetch just that one file
// 3. Parse only its front-matter (no compile)
// 4. Sort by `published`, newest first
//
// A post without an index document is skipped with a warning instead of
// failing the whole listing. That case is a value (IndexLookup::Skipped),
// not an error, so the stream only short-circuits on real failures.
// =============================================================================

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument, warn};

use super::Blog;
use crate::content::{frontmatter, index_rank};
use crate::error::{BlogError, Result};
use crate::github::{Entry, EntryKind};
use crate::model::{PostFile, PostIndexFile, PostListing};

/// Outcome of looking for one post's index document.
#[derive(Debug)]
pub enum IndexLookup {
    Found(PostIndexFile),
    Skipped { slug: String, reason: String },
}

/// Picks the index document from a post directory's entries.
///
/// Only files count. `.mdx` beats `.md`; among equals the smaller name
/// wins, so the choice never depends on listing order.
pub fn select_index(entries: &[Entry]) -> Option<&Entry> {
    entries
        .iter()
        // A directory named "drafts.md" is still a directory
        .filter(|entry| entry.kind == EntryKind::File)
        // Keep only .md/.mdx, remembering how good a match each one is
        .filter_map(|entry| index_rank(&entry.name).map(|rank| (rank, entry)))
        // Lowest rank wins, then alphabetical order
        .min_by(|(a, ea), (b, eb)| a.cmp(b).then_with(|| ea.name.cmp(&eb.name)))
        .map(|(_, entry)| entry)
}

/// Newest first; posts without a usable date go last. Stable, so ties
/// keep their incoming order.
pub fn sort_by_published(listings: &mut [PostListing]) {
    listings.sort_by(|a, b| {
        let (da, db) = (a.frontmatter.published_date(), b.frontmatter.published_date());
        match (da, db) {
            // b before a: reversed, so the newest date comes first
            (Some(da), Some(db)) => db.cmp(&da),
            // Dated posts always beat undated ones
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

impl Blog {
    #[instrument(skip(self))]
    pub async fn get_posts(&self) -> Result<Vec<PostListing>> {
        // Step 1: one listing call for the content root
        let entries = self.tree.list_directory(self.config.content_root()).await?;

        // Step 2: only sub-directories are posts; loose files are ignored.
        // Run up to listing_concurrency lookups at once; results arrive in
        // completion order, which is fine because we sort at the end
        let lookups: Vec<IndexLookup> = stream::iter(
            entries
                .into_iter()
                .filter(|entry| entry.kind == EntryKind::Dir)
                .map(|dir| self.lookup_index(dir)),
        )
        .buffer_unordered(self.config.listing_concurrency)
        .try_collect()
        .await?;

        // Step 3: parse front-matter for the posts we found, log the rest
        let mut listings = Vec::with_capacity(lookups.len());
        for lookup in lookups {
            match lookup {
                IndexLookup::Found(index) => {
                    let frontmatter = frontmatter::parse(&index.file.text()).map_err(|source| {
                        BlogError::Frontmatter {
                            path: self.config.post_path(&format!("{}/{}", index.slug, index.file.path)),
                            source,
                        }
                    })?;
                    listings.push(PostListing {
                        slug: index.slug,
                        frontmatter,
                    });
                }
                IndexLookup::Skipped { slug, reason } => {
                    warn!(%slug, %reason, "skipping post");
                }
            }
        }

        // Step 4: newest first
        sort_by_published(&mut listings);
        debug!(count = listings.len(), "listed posts");
        Ok(listings)
    }

    async fn lookup_index(&self, dir: Entry) -> Result<IndexLookup> {
        // List the post directory itself (not recursively)
        let entries = self.tree.list_directory(&dir.path).await?;

        // No index document is a normal outcome, not an error
        let Some(index) = select_index(&entries) else {
            return Ok(IndexLookup::Skipped {
                slug: dir.name,
                reason: format!("no index.md(x) file in {}", dir.path),
            });
        };

        // Only the index document is fetched; images and other assets
        // are left alone until someone asks for the full post
        let content = self.tree.fetch_blob(&index.content_id).await?;
        Ok(IndexLookup::Found(PostIndexFile {
            slug: dir.name,
            file: PostFile {
                path: index.name.clone(),
                content,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::testing::harness;
    use crate::content::Frontmatter;
    use crate::github::fake::FakeTree;

    fn entry(name: &str, kind: EntryKind) -> Entry {
        Entry {
            name: name.to_string(),
            path: format!("content/blog/post/{name}"),
            kind,
            content_id: format!("sha-{name}"),
        }
    }

    fn post(slug: &str, published: &str) -> (String, String) {
        (
            format!("content/blog/{slug}/index.mdx"),
            format!("---\ntitle: {slug}\npublished: {published}\n---\nbody\n"),
        )
    }

    #[tokio::test]
    async fn test_sorted_newest_first() {
        let tree = FakeTree::new();
        for (path, text) in [
            post("first", "2020-01-01"),
            post("second", "2021-06-15"),
            post("third", "2019-03-01"),
        ] {
            tree.put(&path, &text);
        }
        let h = harness(tree);

        let posts = h.blog.get_posts().await.unwrap();
        let dates: Vec<_> = posts
            .iter()
            .map(|p| p.frontmatter.published.as_deref().unwrap())
            .collect();

        assert_eq!(dates, vec!["2021-06-15", "2020-01-01", "2019-03-01"]);
        assert_eq!(posts[0].slug, "second");
    }

    #[tokio::test]
    async fn test_post_without_index_is_skipped() {
        let (path, text) = post("real", "2020-01-01");
        let tree = FakeTree::new()
            .with_file(&path, &text)
            .with_file("content/blog/assets-only/cover.png", "png")
            .with_file("content/blog/README.txt", "not a post");
        let h = harness(tree);

        let posts = h.blog.get_posts().await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "real");
        assert_eq!(h.compiler.runs(), 0);
    }

    #[tokio::test]
    async fn test_fetches_only_index_documents() {
        let (path, text) = post("real", "2020-01-01");
        let tree = FakeTree::new()
            .with_file(&path, &text)
            .with_file("content/blog/real/images/a.png", "a")
            .with_file("content/blog/real/images/b.png", "b");
        let h = harness(tree);

        h.blog.get_posts().await.unwrap();
        assert_eq!(h.tree.blob_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_fails_listing() {
        let (path, text) = post("real", "2020-01-01");
        let tree = FakeTree::new().with_file(&path, &text);
        tree.break_blob(&path);
        let h = harness(tree);

        let err = h.blog.get_posts().await.unwrap_err();
        assert!(matches!(err, BlogError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_bad_frontmatter_names_the_file() {
        let tree = FakeTree::new()
            .with_file("content/blog/broken/index.md", "---\ntitle: [oops\n---\n");
        let h = harness(tree);

        match h.blog.get_posts().await.unwrap_err() {
            BlogError::Frontmatter { path, .. } => {
                assert_eq!(path, "content/blog/broken/index.md")
            }
            other => panic!("expected Frontmatter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unusual_frontmatter_shape_is_listed() {
        let (path, text) = post("real", "2020-01-01");
        let tree = FakeTree::new()
            .with_file(&path, &text)
            .with_file("content/blog/other/index.mdx", "---\ntitle: Other\ntags: rust\n---\n");
        let h = harness(tree);

        let posts = h.blog.get_posts().await.unwrap();

        assert_eq!(posts.len(), 2);
        let other = posts.iter().find(|p| p.slug == "other").unwrap();
        assert_eq!(other.frontmatter.title.as_deref(), Some("Other"));
        assert_eq!(other.frontmatter.tags, vec!["rust"]);
    }

    #[test]
    fn test_select_index_prefers_mdx_then_name() {
        let entries = vec![
            entry("notes.md", EntryKind::File),
            entry("index.md", EntryKind::File),
            entry("index.mdx", EntryKind::File),
            entry("cover.png", EntryKind::File),
        ];
        assert_eq!(select_index(&entries).unwrap().name, "index.mdx");

        let md_only = vec![entry("notes.md", EntryKind::File), entry("index.md", EntryKind::File)];
        assert_eq!(select_index(&md_only).unwrap().name, "index.md");
    }

    #[test]
    fn test_select_index_ignores_directories() {
        let entries = vec![entry("drafts.md", EntryKind::Dir), entry("cover.png", EntryKind::File)];
        assert!(select_index(&entries).is_none());
    }

    #[test]
    fn test_missing_dates_sort_last_and_stay_stable() {
        let listing = |slug: &str, published: Option<&str>| PostListing {
            slug: slug.to_string(),
            frontmatter: Frontmatter {
                published: published.map(str::to_string),
                ..Frontmatter::default()
            },
        };
        let mut posts = vec![
            listing("undated-a", None),
            listing("old", Some("2019-03-01")),
            listing("undated-b", Some("not a date")),
            listing("new", Some("2021-06-15")),
        ];
        sort_by_published(&mut posts);

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "undated-a", "undated-b"]);
    }
}
