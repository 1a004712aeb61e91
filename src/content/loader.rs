//! Content loader - builds the post index from the content directory

use chrono::Local;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentRecord, FrontMatter};
use crate::error::{Error, Result};
use crate::Blog;

/// Loads posts from `<content_dir>/<category>/<file>.md|mdx`
pub struct ContentLoader<'a> {
    blog: &'a Blog,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Load all published posts, newest first
    pub fn load_posts(&self) -> Result<Vec<ContentRecord>> {
        let posts: Vec<ContentRecord> = self
            .load_records()?
            .into_iter()
            .filter(|post| {
                if !post.published {
                    tracing::debug!("Skipping unpublished post {:?}", post.source);
                }
                post.published
            })
            .collect();

        self.check_slugs(&posts)?;

        tracing::debug!(
            "Indexed {} posts from {:?}",
            posts.len(),
            self.blog.content_dir
        );
        Ok(posts)
    }

    /// Every post that parses, drafts included, newest first
    pub fn load_records(&self) -> Result<Vec<ContentRecord>> {
        let mut records = Vec::new();

        for category in self.category_dirs()? {
            let dir = self.blog.content_dir.join(&category);
            for path in markdown_files(&dir) {
                match self.load_post(&path, &category) {
                    Ok(post) => records.push(post),
                    Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
                }
            }
        }

        // Sort by date descending (newest first); stable, so ties keep scan order
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    /// Names of the category directories, sorted. Empty when the content directory is missing.
    ///
    /// Only a failure to list the content directory itself is an error; bad
    /// entries inside it are logged and skipped.
    pub fn category_dirs(&self) -> Result<Vec<String>> {
        let root = &self.blog.content_dir;
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut categories = Vec::new();
        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(std::io::Error::from(e).into()),
                Err(e) => {
                    tracing::warn!("Skipping category entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                tracing::warn!("Skipping non UTF-8 directory {:?}", entry.path());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            categories.push(name.to_string());
        }

        Ok(categories)
    }

    /// Load a single post from a file
    fn load_post(&self, path: &Path, category_dir: &str) -> Result<ContentRecord> {
        let raw_content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw_content).map_err(|e| Error::parse(path, e))?;

        let date = fm
            .parse_date()
            .map_err(|e| Error::parse(path, e))?
            .unwrap_or_else(Local::now);

        let file_slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let config = &self.blog.config;
        let reading_time = non_empty(fm.reading_time)
            .unwrap_or_else(|| reading_time(body, config.words_per_minute));

        Ok(ContentRecord {
            title: non_empty(fm.title).unwrap_or_else(|| "Untitled".to_string()),
            description: fm.description.unwrap_or_default(),
            date,
            category: non_empty(fm.category).unwrap_or_else(|| category_dir.to_string()),
            tags: fm.tags,
            slug: non_empty(fm.slug).unwrap_or(file_slug),
            reading_time,
            cover_image: non_empty(fm.cover_image),
            author: non_empty(fm.author).unwrap_or_else(|| config.author.clone()),
            published: fm.published,
            content: body.to_string(),
            raw_content: raw_content.clone(),
            source: path.to_path_buf(),
        })
    }

    /// Report posts that resolve to the same slug
    fn check_slugs(&self, posts: &[ContentRecord]) -> Result<()> {
        let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
        for post in posts {
            if let Some(first) = seen.get(post.slug.as_str()) {
                if self.blog.config.strict_slugs {
                    return Err(Error::DuplicateSlug {
                        slug: post.slug.clone(),
                        first: first.to_path_buf(),
                        second: post.source.clone(),
                    });
                }
                tracing::warn!(
                    "Duplicate slug '{}': {:?} shadows {:?}",
                    post.slug,
                    first,
                    post.source
                );
                continue;
            }
            seen.insert(&post.slug, &post.source);
        }
        Ok(())
    }
}

/// Markdown files directly inside `dir`, sorted by name. Unreadable entries are skipped.
fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping entry in {:?}: {}", dir, e);
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_markdown_file(path) {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "mdx")
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reading time label for a markdown body, e.g. "3 min read"
pub fn reading_time(body: &str, words_per_minute: usize) -> String {
    let words = count_words(body);
    let minutes = words.div_ceil(words_per_minute.max(1));
    format!("{} min read", minutes)
}

/// Count words: runs of ASCII alphanumerics, plus one per CJK ideograph
pub fn count_words(text: &str) -> usize {
    let mut count = 0;
    let mut in_word = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if !in_word {
                in_word = true;
                count += 1;
            }
        } else if ('\u{4E00}'..='\u{9FFF}').contains(&c) {
            count += 1;
            in_word = false;
        } else {
            in_word = false;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn blog_at(root: &Path, config: SiteConfig) -> Blog {
        Blog::with_config(root, config)
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Hello, world! It's 2024."), 5);
        assert_eq!(count_words("你好世界"), 4);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_reading_time() {
        let body = "word ".repeat(450);
        assert_eq!(reading_time(&body, 200), "3 min read");
        assert_eq!(reading_time("one two", 200), "1 min read");
        assert_eq!(reading_time("", 200), "0 min read");
    }

    #[test]
    fn test_load_with_defaults() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "content/blogs/notes/hello.md",
            "---\ntitle: \"Hi\"\ndate: 2024-01-01\n---\n# Hi\n\nSome *text*.",
        );
        write(dir.path(), "content/blogs/notes/bare.mdx", "No front matter here.");

        let blog = blog_at(dir.path(), SiteConfig::default());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 2);

        // The undated post is dated now, so it sorts first
        let bare = &posts[0];
        assert_eq!(bare.slug, "bare");
        assert_eq!(bare.title, "Untitled");
        assert_eq!(bare.description, "");
        assert_eq!(bare.author, "Anonymous");
        assert!(bare.tags.is_empty());

        let hello = &posts[1];
        assert_eq!(hello.slug, "hello");
        assert_eq!(hello.title, "Hi");
        assert_eq!(hello.category, "notes");
        assert_eq!(hello.content, "# Hi\n\nSome *text*.");
        assert!(hello.raw_content.starts_with("---\ntitle"));
        assert_eq!(hello.reading_time, "1 min read");
        assert_eq!(hello.date.format("%Y-%m-%d").to_string(), "2024-01-01");
    }

    #[test]
    fn test_front_matter_overrides() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "content/blogs/misc/file-name.md",
            "---\nslug: custom\ncategory: React\nauthor: Ada\nreadingTime: 12 min read\ncoverImage: /c.png\n---\nbody",
        );

        let blog = blog_at(dir.path(), SiteConfig::default());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        let post = &posts[0];
        assert_eq!(post.slug, "custom");
        assert_eq!(post.category, "React");
        assert_eq!(post.author, "Ada");
        assert_eq!(post.reading_time, "12 min read");
        assert_eq!(post.cover_image.as_deref(), Some("/c.png"));
    }

    #[test]
    fn test_filters_unpublished_and_sorts_newest_first() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/blogs/a/old.md", "---\ndate: 2023-05-01\n---\n");
        write(dir.path(), "content/blogs/b/new.md", "---\ndate: 2024-05-01\n---\n");
        write(dir.path(), "content/blogs/a/mid.md", "---\ndate: 2023-12-01\n---\n");
        write(
            dir.path(),
            "content/blogs/a/draft.md",
            "---\ndate: 2025-01-01\npublished: false\n---\n",
        );

        let blog = blog_at(dir.path(), SiteConfig::default());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
        assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/blogs/a/good.md", "---\ntitle: Good\n---\n");
        write(dir.path(), "content/blogs/a/broken.md", "---\ntitle: Broken\n");
        write(dir.path(), "content/blogs/a/bad-date.md", "---\ndate: someday\n---\n");
        write(dir.path(), "content/blogs/a/notes.txt", "not markdown");

        let blog = blog_at(dir.path(), SiteConfig::default());
        let posts = ContentLoader::new(&blog).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
    }

    #[test]
    fn test_load_records_keeps_drafts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/blogs/a/live.md", "---
date: 2024-01-01
---
");
        write(
            dir.path(),
            "content/blogs/b/draft.md",
            "---
date: 2024-02-01
published: false
---
",
        );

        let blog = blog_at(dir.path(), SiteConfig::default());
        let loader = ContentLoader::new(&blog);
        let slugs: Vec<_> = loader
            .load_records()
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["draft", "live"]);
        assert_eq!(loader.load_posts().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlinks_are_skipped() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/blogs/notes/good.md", "---
title: Good
---
");
        let content = dir.path().join("content/blogs");
        symlink("/nonexistent/target.md", content.join("notes/dead.md")).unwrap();
        symlink("/nonexistent/category", content.join("gone")).unwrap();

        let blog = blog_at(dir.path(), SiteConfig::default());
        let loader = ContentLoader::new(&blog);
        assert_eq!(loader.category_dirs().unwrap(), vec!["notes"]);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Good");
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = TempDir::new().unwrap();
        let blog = blog_at(dir.path(), SiteConfig::default());
        let loader = ContentLoader::new(&blog);
        assert!(loader.load_posts().unwrap().is_empty());
        assert!(loader.category_dirs().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_slugs() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/blogs/a/same.md", "---\ndate: 2024-01-02\n---\n");
        write(dir.path(), "content/blogs/b/same.md", "---\ndate: 2024-01-01\n---\n");

        let blog = blog_at(dir.path(), SiteConfig::default());
        assert_eq!(ContentLoader::new(&blog).load_posts().unwrap().len(), 2);

        let strict = SiteConfig {
            strict_slugs: true,
            ..SiteConfig::default()
        };
        let blog = blog_at(dir.path(), strict);
        let err = ContentLoader::new(&blog).load_posts().unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug { ref slug, .. } if slug == "same"));
    }

    #[test]
    fn test_category_dirs_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/blogs/zeta")).unwrap();
        fs::create_dir_all(dir.path().join("content/blogs/alpha")).unwrap();
        fs::create_dir_all(dir.path().join("content/blogs/.hidden")).unwrap();
        write(dir.path(), "content/blogs/stray.md", "not in a category");

        let blog = blog_at(dir.path(), SiteConfig::default());
        let dirs = ContentLoader::new(&blog).category_dirs().unwrap();
        assert_eq!(dirs, vec!["alpha", "zeta"]);
    }
}
