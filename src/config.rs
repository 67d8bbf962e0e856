// src/config.rs
// =============================================================================
// Settings every component needs, collected in one struct.
//
// The CLI fills this in (flags, with environment variable fallbacks) and
// hands it to each component when it is constructed. Nothing below main.rs
// reads the environment itself.
// =============================================================================

use std::path::PathBuf;

use url::Url;

use crate::error::{BlogError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CONTENT_PATH: &str = "content/blog";
pub const DEFAULT_LISTING_CONCURRENCY: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    /// Repository owner (user or organisation).
    pub owner: String,
    pub repo: String,
    /// Directory holding one sub-directory per post.
    pub content_path: String,
    /// Where compiled posts are stored. None keeps them in memory.
    pub cache_dir: Option<PathBuf>,
    pub api_url: Url,
    /// How many post directories the listing inspects at once.
    pub listing_concurrency: usize,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.owner.trim().is_empty() {
            return Err(BlogError::Config("repository owner is empty".to_string()));
        }
        if self.repo.trim().is_empty() {
            return Err(BlogError::Config("repository name is empty".to_string()));
        }
        if self.listing_concurrency == 0 {
            return Err(BlogError::Config(
                "listing concurrency must be at least 1".to_string(),
            ));
        }
        if self.api_url.cannot_be_a_base() {
            return Err(BlogError::Config(format!(
                "API URL `{}` cannot take a path",
                self.api_url
            )));
        }
        Ok(())
    }

    /// Content path with no trailing slash.
    pub fn content_root(&self) -> &str {
        self.content_path.trim_end_matches('/')
    }

    /// Repository path of a post directory: "content/blog" + "hello".
    pub fn post_path(&self, slug: &str) -> String {
        let root = self.content_root();
        if root.is_empty() {
            slug.to_string()
        } else {
            format!("{root}/{slug}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            owner: "kentcdodds".to_string(),
            repo: "blog".to_string(),
            content_path: "content/blog/".to_string(),
            cache_dir: None,
            api_url: Url::parse(DEFAULT_API_URL).unwrap(),
            listing_concurrency: DEFAULT_LISTING_CONCURRENCY,
        }
    }

    #[test]
    fn test_post_path() {
        assert_eq!(config().post_path("hello"), "content/blog/hello");

        let mut at_root = config();
        at_root.content_path = String::new();
        assert_eq!(at_root.post_path("hello"), "hello");
    }

    #[test]
    fn test_validate() {
        assert!(config().validate().is_ok());

        let mut bad = config();
        bad.owner = " ".to_string();
        assert!(matches!(bad.validate(), Err(BlogError::Config(_))));

        let mut bad = config();
        bad.listing_concurrency = 0;
        assert!(bad.validate().is_err());

        let mut bad = config();
        bad.api_url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(bad.validate().is_err());
    }
}
