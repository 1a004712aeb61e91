//! Show a single post

use anyhow::Result;

use crate::content::ContentRecord;
use crate::error::Error;
use crate::Blog;

fn find(blog: &Blog, slug: &str) -> Result<ContentRecord> {
    blog.get_by_slug(slug)?.ok_or_else(|| {
        Error::NotFound {
            kind: "post",
            key: slug.to_string(),
        }
        .into()
    })
}

/// Print a post's metadata, neighbours and rendered HTML
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = find(blog, slug)?;
    let adjacent = blog.get_adjacent(slug)?;

    println!("{}", post.title);
    println!(
        "{} | {} | {} | {}",
        post.date.format("%Y-%m-%d"),
        blog.category_display_name(&post.category.to_lowercase()),
        post.author,
        post.reading_time
    );
    if !post.tags.is_empty() {
        println!("Tags: {}", post.tags.join(", "));
    }
    if let Some(previous) = &adjacent.previous {
        println!("Previous: {} ({})", previous.title, previous.slug);
    }
    if let Some(next) = &adjacent.next {
        println!("Next: {} ({})", next.title, next.slug);
    }
    println!();
    print!("{}", blog.render(&post.content));

    Ok(())
}

/// Print a post's table of contents
pub fn toc(blog: &Blog, slug: &str) -> Result<()> {
    let post = find(blog, slug)?;

    for entry in blog.extract_toc(&post.content) {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(2)));
        println!("{}- {} (#{})", indent, entry.title, entry.id);
    }

    Ok(())
}
