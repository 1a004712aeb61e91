//! Content module - front-matter, indexing, rendering and tables of contents

mod excerpt;
mod frontmatter;
pub mod loader;
mod markdown;
mod record;
mod toc;

pub use excerpt::{excerpt, strip_markdown};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use markdown::MarkdownRenderer;
pub use record::{Adjacent, CategorySummary, ContentRecord, TocEntry};
pub use toc::{extract_toc, extract_toc_with, heading_id};
