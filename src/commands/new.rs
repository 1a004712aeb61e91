//! Create a new post or category

use anyhow::Result;

use crate::authoring::{CategoryDraft, PostDraft};
use crate::Blog;

/// Create a new post
pub fn create_post(
    blog: &Blog,
    title: &str,
    category: &str,
    slug: Option<&str>,
    tags: &[String],
    description: Option<&str>,
) -> Result<()> {
    let mut draft = PostDraft::new(title, category);
    draft.slug = slug.map(str::to_string);
    draft.tags = tags.to_vec();
    draft.description = description.map(str::to_string);

    let path = blog.create_post(&draft)?;
    println!("Created: {:?}", path);

    Ok(())
}

/// Create a new, empty category
pub fn create_category(blog: &Blog, name: &str, slug: Option<&str>) -> Result<()> {
    let draft = CategoryDraft {
        name: name.to_string(),
        slug: slug.map(str::to_string),
    };

    let path = blog.create_category(&draft)?;
    println!(
        "Created category {} at {:?}",
        blog.category_display_name(&draft.slug()),
        path
    );

    Ok(())
}
