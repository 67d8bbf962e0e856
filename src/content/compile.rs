// src/content/compile.rs
// =============================================================================
// Turns a post's downloaded files into something renderable.
//
// The pipeline only knows the Compiler trait: give it a slug and the files,
// get back code + front-matter. The MarkdownCompiler below is the default:
// it renders the index document's body to HTML with pulldown-cmark.
//
// Rust concepts:
// - pulldown-cmark: streaming Markdown parser; push_html drains its
//   events straight into a String
// - anyhow in a trait: compilers can fail for any reason, the caller only
//   needs the message chain
// =============================================================================

use async_trait::async_trait;
use pulldown_cmark::{html, Options, Parser};

use super::frontmatter::{self, Frontmatter};
use super::index_rank;
use crate::model::PostFile;

/// Output of a compiler run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPost {
    pub code: String,
    pub frontmatter: Frontmatter,
}

/// Compiles a post's files. May be slow; should be pure.
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, slug: &str, files: &[PostFile]) -> anyhow::Result<CompiledPost>;
}

/// Renders the index document to HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownCompiler;

impl MarkdownCompiler {
    fn options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options
    }

    /// Picks the index document out of a post's files. Only top-level
    /// files count; `.mdx` wins over `.md`, then name order.
    pub fn find_index(files: &[PostFile]) -> Option<&PostFile> {
        files
            .iter()
            .filter(|file| !file.path.contains('/'))
            .filter_map(|file| index_rank(&file.path).map(|rank| (rank, file)))
            .min_by(|(a, fa), (b, fb)| a.cmp(b).then_with(|| fa.path.cmp(&fb.path)))
            .map(|(_, file)| file)
    }
}

#[async_trait]
impl Compiler for MarkdownCompiler {
    async fn compile(&self, slug: &str, files: &[PostFile]) -> anyhow::Result<CompiledPost> {
        let index = Self::find_index(files).ok_or_else(|| {
            anyhow::anyhow!("no index.md or index.mdx among {} file(s) of {slug}", files.len())
        })?;

        let text = index.text();
        let document = frontmatter::split(&text);
        let frontmatter = frontmatter::parse_matter(document.matter)
            .map_err(|e| anyhow::anyhow!("invalid front-matter in {}: {e}", index.path))?;

        let mut code = String::with_capacity(document.body.len() * 3 / 2);
        html::push_html(&mut code, Parser::new_ext(document.body, Self::options()));

        Ok(CompiledPost { code, frontmatter })
    }
}
