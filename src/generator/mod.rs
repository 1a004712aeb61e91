//! Generator module - writes the RSS feed, sitemap and search index

use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs;

use crate::content::{excerpt, strip_markdown, CategorySummary, ContentRecord};
use crate::error::Result;
use crate::Blog;

/// Characters left as-is in URL path segments
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Writes the SEO surface of the site into the public directory
pub struct Generator<'a> {
    blog: &'a Blog,
}

impl<'a> Generator<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Generate feed.xml, sitemap.xml and search.json
    pub fn generate(&self, posts: &[ContentRecord], categories: &[CategorySummary]) -> Result<()> {
        let public_dir = &self.blog.public_dir;
        fs::create_dir_all(public_dir)?;

        fs::write(public_dir.join("feed.xml"), self.render_feed(posts))?;
        tracing::info!("Generated feed.xml");

        fs::write(
            public_dir.join("sitemap.xml"),
            self.render_sitemap(posts, categories),
        )?;
        tracing::info!("Generated sitemap.xml");

        fs::write(public_dir.join("search.json"), self.render_search_index(posts)?)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Absolute URL of a post
    pub fn post_url(&self, slug: &str) -> String {
        format!(
            "{}/blogs/{}",
            self.blog.config.base_url(),
            utf8_percent_encode(slug, PATH_SEGMENT)
        )
    }

    /// Absolute URL of a category listing
    pub fn category_url(&self, slug: &str) -> String {
        format!(
            "{}/blogs/category/{}",
            self.blog.config.base_url(),
            utf8_percent_encode(slug, PATH_SEGMENT)
        )
    }

    /// RSS 2.0 feed
    pub fn render_feed(&self, posts: &[ContentRecord]) -> String {
        let config = &self.blog.config;
        let base_url = config.base_url();
        let limit = config.feed_limit.unwrap_or(posts.len());

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom" xmlns:content="http://purl.org/rss/1.0/modules/content/">"#);
        feed.push('\n');
        feed.push_str("  <channel>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!("    <link>{}</link>\n", escape_xml(base_url)));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&config.description)
        ));
        feed.push_str(&format!(
            "    <language>{}</language>\n",
            escape_xml(&config.language)
        ));
        feed.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            Utc::now().to_rfc2822()
        ));
        feed.push_str(&format!(
            "    <atom:link href=\"{}/feed.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n",
            escape_xml(base_url)
        ));

        for post in posts.iter().take(limit) {
            let url = escape_xml(&self.post_url(&post.slug));
            let description = if post.description.is_empty() {
                excerpt(&post.content, config.excerpt_length)
            } else {
                post.description.clone()
            };

            feed.push_str("    <item>\n");
            feed.push_str(&format!("      <title>{}</title>\n", cdata(&post.title)));
            feed.push_str(&format!("      <link>{}</link>\n", url));
            feed.push_str(&format!("      <guid isPermaLink=\"true\">{}</guid>\n", url));
            feed.push_str(&format!(
                "      <description>{}</description>\n",
                cdata(&description)
            ));
            feed.push_str(&format!(
                "      <pubDate>{}</pubDate>\n",
                post.date.to_rfc2822()
            ));
            feed.push_str(&format!(
                "      <category>{}</category>\n",
                escape_xml(&post.category)
            ));
            for tag in &post.tags {
                feed.push_str(&format!("      <category>{}</category>\n", escape_xml(tag)));
            }
            feed.push_str("    </item>\n");
        }

        feed.push_str("  </channel>\n");
        feed.push_str("</rss>\n");
        feed
    }

    /// XML sitemap of the home page, post pages and category pages
    pub fn render_sitemap(&self, posts: &[ContentRecord], categories: &[CategorySummary]) -> String {
        let base_url = self.blog.config.base_url();
        let now = Utc::now().to_rfc3339();

        let mut sitemap = String::new();
        sitemap.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        sitemap.push('\n');
        sitemap.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        sitemap.push('\n');

        push_url(&mut sitemap, base_url, &now, "daily", "1.0");
        push_url(&mut sitemap, &format!("{}/blogs", base_url), &now, "daily", "0.9");
        for post in posts {
            push_url(
                &mut sitemap,
                &self.post_url(&post.slug),
                &post.date.to_rfc3339(),
                "weekly",
                "0.8",
            );
        }
        for category in categories {
            push_url(
                &mut sitemap,
                &self.category_url(&category.slug),
                &now,
                "weekly",
                "0.7",
            );
        }

        sitemap.push_str("</urlset>\n");
        sitemap
    }

    /// JSON index for client-side search
    pub fn render_search_index(&self, posts: &[ContentRecord]) -> Result<String> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "title": p.title,
                    "slug": p.slug,
                    "url": format!("/blogs/{}", utf8_percent_encode(&p.slug, PATH_SEGMENT)),
                    "description": p.description,
                    "category": p.category,
                    "tags": p.tags,
                    "date": p.date.format("%Y-%m-%d").to_string(),
                    "content": strip_markdown(&p.content),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&search_data)?)
    }
}

fn push_url(out: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    out.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    out.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    out.push_str(&format!("    <priority>{}</priority>\n", priority));
    out.push_str("  </url>\n");
}

/// Wrap text in a CDATA section
fn cdata(s: &str) -> String {
    let clean = strip_invalid_xml_chars(s);
    format!("<![CDATA[{}]]>", clean.replace("]]>", "]]]]><![CDATA[>"))
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    strip_invalid_xml_chars(s)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn post(slug: &str, title: &str, tags: &[&str]) -> ContentRecord {
        ContentRecord {
            title: title.to_string(),
            description: String::new(),
            date: Local.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
            category: "notes".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            slug: slug.to_string(),
            reading_time: "1 min read".to_string(),
            cover_image: None,
            author: "Anonymous".to_string(),
            published: true,
            content: "Some **body** text.".to_string(),
            raw_content: String::new(),
            source: PathBuf::from(slug),
        }
    }

    fn blog(dir: &TempDir) -> Blog {
        let config = SiteConfig {
            title: "Notes & Code".to_string(),
            url: "https://blog.example.com/".to_string(),
            ..SiteConfig::default()
        };
        Blog::with_config(dir.path(), config)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("bell\u{7}"), "bell");
    }

    #[test]
    fn test_cdata_escapes_terminator() {
        assert_eq!(cdata("x]]>y"), "<![CDATA[x]]]]><![CDATA[>y]]>");
    }

    #[test]
    fn test_render_feed() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let generator = Generator::new(&blog);
        let feed = generator.render_feed(&[post("hello-world", "Hello <World>", &["rust", "C&C"])]);

        assert!(feed.contains("<title>Notes &amp; Code</title>"));
        assert!(feed.contains("<title><![CDATA[Hello <World>]]></title>"));
        assert!(feed.contains("<link>https://blog.example.com/blogs/hello-world</link>"));
        assert!(feed.contains(
            r#"<guid isPermaLink="true">https://blog.example.com/blogs/hello-world</guid>"#
        ));
        // Empty description falls back to an excerpt of the body
        assert!(feed.contains("<description><![CDATA[Some body text.]]></description>"));
        assert!(feed.contains("<category>notes</category>"));
        assert!(feed.contains("<category>C&amp;C</category>"));
        assert!(feed.contains(r#"href="https://blog.example.com/feed.xml""#));
    }

    #[test]
    fn test_feed_limit() {
        let dir = TempDir::new().unwrap();
        let mut blog = blog(&dir);
        blog.config.feed_limit = Some(1);
        let feed =
            Generator::new(&blog).render_feed(&[post("a", "A", &[]), post("b", "B", &[])]);
        assert_eq!(feed.matches("<item>").count(), 1);
    }

    #[test]
    fn test_render_sitemap() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        let categories = vec![CategorySummary {
            name: "AI / ML".to_string(),
            slug: "ai-ml".to_string(),
            count: 0,
        }];
        let sitemap = Generator::new(&blog).render_sitemap(&[post("a b", "A", &[])], &categories);

        assert!(sitemap.contains("<loc>https://blog.example.com</loc>"));
        assert!(sitemap.contains("<loc>https://blog.example.com/blogs</loc>"));
        assert!(sitemap.contains("<loc>https://blog.example.com/blogs/a%20b</loc>"));
        assert!(sitemap.contains("<loc>https://blog.example.com/blogs/category/ai-ml</loc>"));
        assert_eq!(sitemap.matches("<url>").count(), 4);
    }

    #[test]
    fn test_generate_writes_files() {
        let dir = TempDir::new().unwrap();
        let blog = blog(&dir);
        Generator::new(&blog)
            .generate(&[post("a", "A", &["x"])], &[])
            .unwrap();

        assert!(blog.public_dir.join("feed.xml").exists());
        assert!(blog.public_dir.join("sitemap.xml").exists());
        let index = fs::read_to_string(blog.public_dir.join("search.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&index).unwrap();
        assert_eq!(parsed[0]["url"], "/blogs/a");
        assert_eq!(parsed[0]["content"], "Some body text.");
        assert_eq!(parsed[0]["tags"][0], "x");
    }
}
