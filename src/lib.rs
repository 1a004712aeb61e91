//! inkpost: a markdown blog content engine
//!
//! Posts live in `<content_dir>/<category>/<slug>.md` with YAML front-matter.
//! Every query re-scans the content directory; nothing is cached.

pub mod authoring;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod query;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use content::loader::ContentLoader;
use content::{Adjacent, CategorySummary, ContentRecord, MarkdownRenderer, TocEntry};

/// A blog rooted at a base directory
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory, one subdirectory per category
    pub content_dir: PathBuf,
    /// Output directory for generated files
    pub public_dir: PathBuf,
}

impl Blog {
    /// Open a blog, reading `_config.yml` from the base directory if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// All published posts, newest first
    pub fn list_all(&self) -> Result<Vec<ContentRecord>> {
        ContentLoader::new(self).load_posts()
    }

    /// The post with `slug`; the first in listing order if several share it
    pub fn get_by_slug(&self, slug: &str) -> Result<Option<ContentRecord>> {
        Ok(self.list_all()?.into_iter().find(|p| p.slug == slug))
    }

    /// The older (`previous`) and newer (`next`) neighbours of a post
    pub fn get_adjacent(&self, slug: &str) -> Result<Adjacent> {
        Ok(Adjacent::find(&self.list_all()?, slug))
    }

    /// Categories with post counts, including empty category directories
    pub fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let loader = ContentLoader::new(self);
        let posts = loader.load_posts()?;
        let dirs = loader.category_dirs()?;
        Ok(query::category_summaries(
            &posts,
            &dirs,
            &self.config.category_names,
        ))
    }

    pub fn category_by_slug(&self, slug: &str) -> Result<Option<CategorySummary>> {
        Ok(self.list_categories()?.into_iter().find(|c| c.slug == slug))
    }

    /// Display name for a category slug
    pub fn category_display_name(&self, slug: &str) -> String {
        query::display_name(slug, &self.config.category_names)
    }

    pub fn filter_by_category(&self, category: &str) -> Result<Vec<ContentRecord>> {
        Ok(query::filter_by_category(&self.list_all()?, category))
    }

    pub fn filter_by_tag(&self, tag: &str) -> Result<Vec<ContentRecord>> {
        Ok(query::filter_by_tag(&self.list_all()?, tag))
    }

    pub fn search(&self, query: &str) -> Result<Vec<ContentRecord>> {
        Ok(query::search(&self.list_all()?, query))
    }

    pub fn all_tags(&self) -> Result<Vec<String>> {
        Ok(query::all_tags(&self.list_all()?))
    }

    /// Render a markdown body to HTML
    pub fn render(&self, body: &str) -> String {
        MarkdownRenderer::with_options(self.config.raw_html).render(body)
    }

    /// Table of contents for a markdown body, with ids matching `render`
    pub fn extract_toc(&self, body: &str) -> Vec<TocEntry> {
        content::extract_toc_with(body, self.config.raw_html)
    }

    /// Write a new post and return its path
    pub fn create_post(&self, draft: &authoring::PostDraft) -> Result<PathBuf> {
        authoring::create_post(self, draft)
    }

    /// Create a category directory and return its path
    pub fn create_category(&self, draft: &authoring::CategoryDraft) -> Result<PathBuf> {
        authoring::create_category(self, draft)
    }

    /// Write feed.xml, sitemap.xml and search.json to the public directory
    pub fn generate(&self) -> Result<()> {
        let posts = self.list_all()?;
        let categories = self.list_categories()?;
        generator::Generator::new(self).generate(&posts, &categories)
    }
}
