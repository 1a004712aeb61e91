//! Authoring - validate new posts and categories and write them to disk

use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::PathBuf;

use crate::content::loader::ContentLoader;
use crate::content::FrontMatter;
use crate::error::{Error, Result};
use crate::Blog;

lazy_static! {
    static ref KEBAB_CASE: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A post to be written to the content directory
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    /// Derived from the title when absent
    pub slug: Option<String>,
    /// Category slug; the directory the post is written to
    pub category: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    pub body: String,
}

impl PostDraft {
    pub fn new(title: &str, category: &str) -> Self {
        Self {
            title: title.to_string(),
            category: category.to_string(),
            published: true,
            ..Default::default()
        }
    }

    /// The slug the post will be stored under
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.clone(),
            None => slug::slugify(&self.title),
        }
    }

    /// Check every field, collecting all problems into one error
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let title_len = self.title.trim().chars().count();
        if title_len < 3 {
            errors.push("Title is too short.".to_string());
        } else if title_len > 150 {
            errors.push("Title is too large.".to_string());
        }

        check_slug("Slug", &self.slug(), 3, 150, &mut errors);
        check_slug("Category", &self.category, 2, 100, &mut errors);

        for tag in &self.tags {
            let len = tag.trim().chars().count();
            if !(1..=50).contains(&len) {
                errors.push(format!("Tag '{}' must be 1 to 50 characters.", tag));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Tags lowercased with whitespace runs turned into hyphens
    pub fn normalized_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| WHITESPACE.replace_all(&t.trim().to_lowercase(), "-").into_owned())
            .collect()
    }

    /// File content: YAML front-matter followed by the body
    pub fn to_markdown(&self) -> Result<String> {
        let fm = FrontMatter {
            title: Some(self.title.trim().to_string()),
            description: self.description.clone(),
            date: Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            category: Some(self.category.clone()),
            tags: self.normalized_tags(),
            slug: Some(self.slug()),
            reading_time: None,
            cover_image: self.cover_image.clone(),
            author: self.author.clone(),
            published: self.published,
        };
        let yaml = serde_yaml::to_string(&fm)?;
        Ok(format!("---\n{}---\n\n{}\n", yaml, self.body.trim_end()))
    }
}

/// A category to be created as a directory
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: Option<String>,
}

impl CategoryDraft {
    pub fn slug(&self) -> String {
        match &self.slug {
            Some(slug) => slug.clone(),
            None => slug::slugify(&self.name),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len < 2 {
            errors.push("Category Name is too short!".to_string());
        } else if name_len > 100 {
            errors.push("Category Name is too Long!".to_string());
        }
        check_slug("Slug", &self.slug(), 2, 100, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

fn check_slug(field: &str, slug: &str, min: usize, max: usize, errors: &mut Vec<String>) {
    let len = slug.chars().count();
    if len < min || len > max {
        errors.push(format!(
            "{} must be {} to {} characters.",
            field, min, max
        ));
    }
    if !KEBAB_CASE.is_match(slug) {
        errors.push(format!("{} must be kebab-case", field));
    }
}

/// Write a new post to `<content_dir>/<category>/<slug>.md`
pub fn create_post(blog: &Blog, draft: &PostDraft) -> Result<PathBuf> {
    draft.validate()?;

    let slug = draft.slug();
    let dir = blog.content_dir.join(&draft.category);
    let path = dir.join(format!("{}.md", slug));
    if path.exists() {
        return Err(Error::AlreadyExists(path));
    }
    // Drafts included
    if let Some(existing) = ContentLoader::new(blog)
        .load_records()?
        .into_iter()
        .find(|p| p.slug == slug)
    {
        return Err(Error::AlreadyExists(existing.source));
    }

    fs::create_dir_all(&dir)?;
    fs::write(&path, draft.to_markdown()?)?;
    tracing::info!("Created post {:?}", path);

    Ok(path)
}

/// Create an empty category directory
pub fn create_category(blog: &Blog, draft: &CategoryDraft) -> Result<PathBuf> {
    draft.validate()?;

    let path = blog.content_dir.join(draft.slug());
    if path.exists() {
        return Err(Error::AlreadyExists(path));
    }

    fs::create_dir_all(&path)?;
    tracing::info!("Created category {:?}", path);

    Ok(path)
}
