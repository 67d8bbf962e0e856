// src/content/mod.rs
// =============================================================================
// Everything that looks inside a post's documents.
//
// Submodules:
// - frontmatter: YAML metadata block at the top of index.md(x)
// - compile: the Compiler seam and the default Markdown -> HTML compiler
// =============================================================================

mod compile;
pub mod frontmatter;

pub use compile::{CompiledPost, Compiler, MarkdownCompiler};
pub use frontmatter::Frontmatter;

/// How good a name is as a post's index document; lower wins.
///
/// `.mdx` ranks above `.md` so a post carrying both resolves the same way
/// no matter what order the API lists them in.
pub fn index_rank(name: &str) -> Option<u8> {
    if name.ends_with(".mdx") {
        Some(0)
    } else if name.ends_with(".md") {
        Some(1)
    } else {
        None
    }
}
