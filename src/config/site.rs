//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub url: String,
    pub language: String,
    /// Author used when a post does not name one
    pub author: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Writing
    pub words_per_minute: usize,
    pub excerpt_length: usize,
    /// Fail the index build when two posts resolve to the same slug
    pub strict_slugs: bool,
    /// Pass raw HTML in markdown through to the output
    pub raw_html: bool,

    // Feed
    pub feed_limit: Option<usize>,

    // Category display names, keyed by category slug
    pub category_names: HashMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            url: "https://example.com".to_string(),
            language: "en-us".to_string(),
            author: "Anonymous".to_string(),

            content_dir: "content/blogs".to_string(),
            public_dir: "public".to_string(),

            words_per_minute: 200,
            excerpt_length: 160,
            strict_slugs: false,
            raw_html: true,

            feed_limit: None,

            category_names: default_category_names(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn default_category_names() -> HashMap<String, String> {
    [
        ("javascript", "JavaScript"),
        ("react", "React"),
        ("nextjs", "Next.js"),
        ("backend", "Backend"),
        ("ai-ml", "AI / ML"),
        ("notes", "Notes & Learnings"),
        ("typescript", "TypeScript"),
        ("css", "CSS"),
        ("database", "Database"),
        ("devops", "DevOps"),
    ]
    .into_iter()
    .map(|(slug, name)| (slug.to_string(), name.to_string()))
    .collect()
}
