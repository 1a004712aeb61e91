//! Generate the feed, sitemap and search index

use anyhow::Result;

use crate::Blog;

/// Generate all output files into the public directory
pub fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    blog.generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated into {:?} in {:.2}s",
        blog.public_dir,
        duration.as_secs_f64()
    );

    Ok(())
}
