//! List and search site content

use anyhow::Result;

use crate::content::ContentRecord;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = blog.list_all()?;
            println!("Posts ({}):", posts.len());
            print_posts(&posts);
        }
        "tag" | "tags" => {
            let posts = blog.list_all()?;
            let tags = crate::query::all_tags(&posts);
            println!("Tags ({}):", tags.len());
            for tag in tags {
                let count = posts.iter().filter(|p| p.has_tag(&tag)).count();
                println!("  {} ({})", tag, count);
            }
        }
        "category" | "categories" => {
            let categories = blog.list_categories()?;
            println!("Categories ({}):", categories.len());
            for cat in categories {
                println!("  {} [{}] ({})", cat.name, cat.slug, cat.count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, category",
                content_type
            );
        }
    }

    Ok(())
}

/// List posts in a category or with a tag
pub fn filtered(blog: &Blog, category: Option<&str>, tag: Option<&str>) -> Result<()> {
    let mut posts = match category {
        Some(category) => blog.filter_by_category(category)?,
        None => blog.list_all()?,
    };
    if let Some(tag) = tag {
        posts = crate::query::filter_by_tag(&posts, tag);
    }

    println!("Posts ({}):", posts.len());
    print_posts(&posts);
    Ok(())
}

/// Search posts by title, description, body and tags
pub fn search(blog: &Blog, query: &str) -> Result<()> {
    let posts = blog.search(query)?;
    println!("Results for {:?} ({}):", query, posts.len());
    print_posts(&posts);
    Ok(())
}

fn print_posts(posts: &[ContentRecord]) {
    for post in posts {
        println!(
            "  {} - {} [{}/{}] {}",
            post.date.format("%Y-%m-%d"),
            post.title,
            post.category,
            post.slug,
            post.reading_time
        );
    }
}
