//! Content record models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A blog post loaded from a content file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Post title
    pub title: String,

    /// Short summary shown in listings
    pub description: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Category id, usually the directory name
    pub category: String,

    /// Tags, case preserved
    pub tags: Vec<String>,

    /// URL-friendly identifier
    pub slug: String,

    /// Reading time label, e.g. "4 min read"
    pub reading_time: String,

    /// Cover image reference
    pub cover_image: Option<String>,

    pub author: String,

    /// Whether the post is published
    pub published: bool,

    /// Markdown body without front-matter
    pub content: String,

    /// Full file text including front-matter
    pub raw_content: String,

    /// Source file path
    pub source: PathBuf,
}

impl ContentRecord {
    /// Whether the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Whether the post belongs to `category`, ignoring case
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// A category with its post count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Display name
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// One table-of-contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Anchor id of the heading
    pub id: String,
    pub title: String,
    /// Heading level, 2 to 4
    pub level: u8,
}

/// Neighbours of a post in date order.
///
/// `previous` is the next-older post and `next` the next-newer one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adjacent {
    pub previous: Option<ContentRecord>,
    pub next: Option<ContentRecord>,
}

impl Adjacent {
    /// Find the neighbours of `slug` in a newest-first list
    pub fn find(records: &[ContentRecord], slug: &str) -> Self {
        let Some(pos) = records.iter().position(|r| r.slug == slug) else {
            return Self::default();
        };

        Self {
            previous: records.get(pos + 1).cloned(),
            next: pos.checked_sub(1).and_then(|i| records.get(i)).cloned(),
        }
    }
}
