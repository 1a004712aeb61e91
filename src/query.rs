//! Queries over the post index: filters, search, tags and categories

use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

use crate::content::{CategorySummary, ContentRecord};

/// Posts in `category`, ignoring case
pub fn filter_by_category(posts: &[ContentRecord], category: &str) -> Vec<ContentRecord> {
    posts
        .iter()
        .filter(|p| p.in_category(category))
        .cloned()
        .collect()
}

/// Posts carrying `tag`, ignoring case
pub fn filter_by_tag(posts: &[ContentRecord], tag: &str) -> Vec<ContentRecord> {
    posts.iter().filter(|p| p.has_tag(tag)).cloned().collect()
}

/// Posts whose title, description, body or any tag contains `query`, ignoring case
pub fn search(posts: &[ContentRecord], query: &str) -> Vec<ContentRecord> {
    let query = query.to_lowercase();
    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query)
                || p.content.to_lowercase().contains(&query)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .cloned()
        .collect()
}

/// Every distinct tag, sorted
pub fn all_tags(posts: &[ContentRecord]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Post counts per category, including empty category directories.
///
/// Sorted by count descending, then by display name.
pub fn category_summaries(
    posts: &[ContentRecord],
    category_dirs: &[String],
    names: &HashMap<String, String>,
) -> Vec<CategorySummary> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for post in posts {
        *counts.entry(post.category.to_lowercase()).or_insert(0) += 1;
    }
    for dir in category_dirs {
        counts.entry(dir.to_lowercase()).or_insert(0);
    }

    let mut categories: Vec<CategorySummary> = counts
        .into_iter()
        .map(|(slug, count)| CategorySummary {
            name: display_name(&slug, names),
            slug,
            count,
        })
        .collect();

    categories.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

/// Display name for a category slug: the configured name, or the slug title-cased
pub fn display_name(slug: &str, names: &HashMap<String, String>) -> String {
    if let Some(name) = names.get(slug) {
        return name.clone();
    }

    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
