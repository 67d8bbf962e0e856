// src/github/download.rs
// =============================================================================
// Recursively downloads every file under a remote directory.
//
// How it works:
// 1. List the directory
// 2. For each entry, at the same time:
//    - file -> fetch its blob
//    - dir  -> recurse
// 3. Wait for all of them (try_join_all) and flatten the results
//
// try_join_all returns the first error it sees and drops the remaining
// futures, so a single failed file fails the whole download and no
// partial set of files ever escapes.
//
// Rust concepts:
// - BoxFuture: an async fn can't call itself directly (its future type
//   would be infinitely sized), so the recursive step returns a boxed
//   future instead
// - try_join_all: like Promise.all() for futures that return Result
// =============================================================================

use futures::future::{try_join_all, BoxFuture, FutureExt};
use tracing::{debug, instrument};

use super::{Entry, EntryKind, RemoteTree};
use crate::error::{BlogError, Result};
use crate::model::PostFile;

// Downloads everything under `path`.
//
// Returned paths are relative to `path`: downloading "content/blog/hello"
// yields "index.mdx" and "images/cover.png", not the full repo paths.
// Order is not meaningful.
#[instrument(skip(tree))]
pub async fn download_directory<T>(tree: &T, path: &str) -> Result<Vec<PostFile>>
where
    T: RemoteTree + ?Sized,
{
    let root = path.trim_end_matches('/');
    let files = download_tree(tree, root, root.to_string()).await?;
    debug!(count = files.len(), "directory downloaded");
    Ok(files)
}

fn download_tree<'a, T>(
    tree: &'a T,
    root: &'a str,
    dir: String,
) -> BoxFuture<'a, Result<Vec<PostFile>>>
where
    T: RemoteTree + ?Sized,
{
    async move {
        let entries = tree.list_directory(&dir).await?;

        let tasks = entries
            .into_iter()
            .map(|entry| download_entry(tree, root, entry));

        let nested = try_join_all(tasks).await?;
        Ok(nested.into_iter().flatten().collect())
    }
    .boxed()
}

async fn download_entry<T>(tree: &T, root: &str, entry: Entry) -> Result<Vec<PostFile>>
where
    T: RemoteTree + ?Sized,
{
    match entry.kind {
        EntryKind::File => {
            let content = tree.fetch_blob(&entry.content_id).await?;
            Ok(vec![PostFile {
                path: relative_path(root, &entry.path),
                content,
            }])
        }
        EntryKind::Dir => download_tree(tree, root, entry.path).await,
        EntryKind::Other(kind) => Err(BlogError::UnexpectedEntryType {
            path: entry.path,
            kind,
        }),
    }
}

// "content/blog/hello/images/a.png" under "content/blog/hello" -> "images/a.png"
fn relative_path(root: &str, full: &str) -> String {
    if root.is_empty() {
        return full.to_string();
    }
    full.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(full)
        .to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does download_tree return BoxFuture instead of being an async fn?
//    - An async fn compiles to a state machine that stores its locals
//    - If it awaits itself, the state machine would contain itself
//    - Box::pin (via .boxed()) puts the inner call on the heap, which
//      gives the type a fixed size again
//
// 2. What does the 'a lifetime say?
//    - The future borrows `tree` and `root`
//    - It must not outlive them, and 'a ties them together
//
// 3. Why `T: RemoteTree + ?Sized`?
//    - ?Sized allows T to be `dyn RemoteTree`
//    - So callers can pass either a concrete client or a trait object
//
// 4. Are sibling downloads cancelled when one fails?
//    - try_join_all stops polling the others and drops them
//    - Requests already on the wire may still finish; their results are
//      thrown away. Nothing here writes anything, so that's harmless.
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::fake::FakeTree;

    fn sorted_paths(files: &[PostFile]) -> Vec<&str> {
        let mut paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        paths.sort();
        paths
    }

    #[tokio::test]
    async fn test_downloads_nested_tree() {
        let tree = FakeTree::new()
            .with_file("content/blog/hello/index.mdx", "---\ntitle: Hello\n---\n")
            .with_file("content/blog/hello/images/cover.png", "png")
            .with_file("content/blog/hello/images/raw/huge.png", "png2")
            .with_file("content/blog/hello/code/a/b/c/demo.js", "console.log(1)")
            .with_file("content/blog/other/index.md", "not mine");

        let files = download_directory(&tree, "content/blog/hello").await.unwrap();

        assert_eq!(files.len(), 4);
        assert_eq!(
            sorted_paths(&files),
            vec![
                "code/a/b/c/demo.js",
                "images/cover.png",
                "images/raw/huge.png",
                "index.mdx"
            ]
        );
        let demo = files.iter().find(|f| f.path == "code/a/b/c/demo.js").unwrap();
        assert_eq!(demo.content, b"console.log(1)");
    }

    #[tokio::test]
    async fn test_trailing_slash_is_ignored() {
        let tree = FakeTree::new().with_file("posts/a/index.md", "x");
        let files = download_directory(&tree, "posts/a/").await.unwrap();
        assert_eq!(sorted_paths(&files), vec!["index.md"]);
    }

    #[tokio::test]
    async fn test_one_failed_blob_fails_everything() {
        let tree = FakeTree::new()
            .with_file("content/blog/hello/index.mdx", "ok")
            .with_file("content/blog/hello/images/a.png", "ok")
            .with_file("content/blog/hello/images/b.png", "broken");
        tree.break_blob("content/blog/hello/images/b.png");

        let err = download_directory(&tree, "content/blog/hello")
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_unexpected_entry_type_is_fatal() {
        let tree = FakeTree::new().with_file("content/blog/hello/index.mdx", "ok");
        tree.add_odd("content/blog/hello/vendor", "submodule");

        let err = download_directory(&tree, "content/blog/hello")
            .await
            .unwrap_err();
        match err {
            BlogError::UnexpectedEntryType { path, kind } => {
                assert_eq!(path, "content/blog/hello/vendor");
                assert_eq!(kind, "submodule");
            }
            other => panic!("expected UnexpectedEntryType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let tree = FakeTree::new().with_file("content/blog/hello/index.mdx", "ok");
        let err = download_directory(&tree, "content/blog/nope")
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::NotFound { .. }));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("a/b", "a/b/c/d.md"), "c/d.md");
        assert_eq!(relative_path("", "c/d.md"), "c/d.md");
        // sibling with a shared prefix is not stripped
        assert_eq!(relative_path("a/b", "a/bc/d.md"), "a/bc/d.md");
    }
}
