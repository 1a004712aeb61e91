//! Markdown rendering with heading anchors

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;

use super::toc::heading_id;

lazy_static! {
    /// Bare URLs starting at a word boundary, minus trailing punctuation that usually ends the sentence
    static ref BARE_URL: Regex =
        Regex::new(r#"\b(?:https?://|www\.)[^\s<]*[^\s<?!.,:;*_~'")\]]"#).unwrap();
}

/// Parser options shared by the renderer and the TOC extractor
pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Markdown renderer producing anchored headings
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    raw_html: bool,
}

/// A heading whose events are held back until its id is known
struct PendingHeading<'a> {
    level: HeadingLevel,
    events: Vec<Event<'a>>,
    text: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer that passes raw HTML through
    pub fn new() -> Self {
        Self { raw_html: true }
    }

    /// Create with custom settings
    pub fn with_options(raw_html: bool) -> Self {
        Self { raw_html }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, markdown_options()));

        let mut events: Vec<Event> = Vec::new();
        let mut heading: Option<PendingHeading> = None;
        // Depth of constructs whose text must not be autolinked
        let mut no_autolink = 0usize;

        for event in parser {
            let event = self.filter_html(event);

            if let Some(pending) = heading.as_mut() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        if let Some(pending) = heading.take() {
                            push_heading(&mut events, pending);
                        }
                    }
                    Event::Text(ref text) | Event::Code(ref text) => {
                        pending.text.push_str(text);
                        pending.events.push(event);
                    }
                    _ => pending.events.push(event),
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(PendingHeading {
                        level,
                        events: Vec::new(),
                        text: String::new(),
                    });
                }
                Event::Start(Tag::Link { .. })
                | Event::Start(Tag::Image { .. })
                | Event::Start(Tag::CodeBlock(_)) => {
                    no_autolink += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link)
                | Event::End(TagEnd::Image)
                | Event::End(TagEnd::CodeBlock) => {
                    no_autolink = no_autolink.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text) if no_autolink == 0 => autolink(&mut events, text),
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn filter_html<'a>(&self, event: Event<'a>) -> Event<'a> {
        filter_raw_html(event, self.raw_html)
    }
}

/// Turn raw HTML into text when passthrough is disabled
pub(crate) fn filter_raw_html(event: Event<'_>, raw_html: bool) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) if !raw_html => Event::Text(raw),
        other => other,
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit a heading with its id and its content wrapped in a self-link
fn push_heading<'a>(events: &mut Vec<Event<'a>>, pending: PendingHeading<'a>) {
    let id = heading_id(pending.text.trim());
    if id.is_empty() {
        events.push(Event::Start(heading_tag(pending.level, None)));
        events.extend(pending.events);
        events.push(Event::End(TagEnd::Heading(pending.level)));
        return;
    }

    let link = format!(r##"<a class="anchor-link" href="#{}">"##, id);
    events.push(Event::Start(heading_tag(pending.level, Some(id))));
    events.push(Event::InlineHtml(CowStr::from(link)));
    events.extend(pending.events);
    events.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
    events.push(Event::End(TagEnd::Heading(pending.level)));
}

fn heading_tag<'a>(level: HeadingLevel, id: Option<String>) -> Tag<'a> {
    Tag::Heading {
        level,
        id: id.map(CowStr::from),
        classes: Vec::new(),
        attrs: Vec::new(),
    }
}

/// Turn bare URLs in a text run into links
fn autolink<'a>(events: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    if !BARE_URL.is_match(&text) {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for m in BARE_URL.find_iter(&text) {
        if m.start() > last {
            events.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }
        let url = m.as_str();
        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::InlineHtml(CowStr::from(format!(
            r#"<a href="{}">{}</a>"#,
            html_escape(&href),
            html_escape(url)
        ))));
        last = m.end();
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{extract_toc, extract_toc_with};

    #[test]
    fn test_render_heading_and_emphasis() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hi\n\nSome *text*.");
        assert!(html.contains(r##"<h1 id="hi"><a class="anchor-link" href="#hi">Hi</a></h1>"##));
        assert!(html.contains("<p>Some <em>text</em>.</p>"));
        assert!(html.find("<h1").unwrap() < html.find("<p>").unwrap());
    }

    #[test]
    fn test_heading_with_inline_markup() {
        let html = MarkdownRenderer::new().render("## Using `useState` **right**");
        assert!(html.contains(r#"<h2 id="using-usestate-right">"#));
        assert!(html.contains("<code>useState</code>"));
    }

    #[test]
    fn test_gfm_extensions() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~ new");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_autolink_bare_urls() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Visit https://example.com/docs. Or www.rust-lang.org");
        assert!(html.contains(r#"<a href="https://example.com/docs">https://example.com/docs</a>."#));
        assert!(html.contains(r#"<a href="http://www.rust-lang.org">www.rust-lang.org</a>"#));
    }

    #[test]
    fn test_autolink_needs_word_boundary() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("awww.example.com and xhttps://example.com");
        assert!(!html.contains("<a "), "{}", html);

        let html = renderer.render("(www.example.com)");
        assert!(html.contains(r#"(<a href="http://www.example.com">www.example.com</a>)"#));
    }

    #[test]
    fn test_no_autolink_in_code_or_links() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("`https://a.io` and [https://b.io](https://b.io)");
        assert!(html.contains("<code>https://a.io</code>"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_raw_html_passthrough() {
        let md = "<div class=\"note\">hi</div>\n";
        let html = MarkdownRenderer::new().render(md);
        assert!(html.contains("<div class=\"note\">hi</div>"));

        let escaped = MarkdownRenderer::with_options(false).render(md);
        assert!(escaped.contains("&lt;div"));
        assert!(!escaped.contains("<div"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::new();
        let md = "## Intro\n\nSee https://example.com\n\n## Intro\n";
        assert_eq!(renderer.render(md), renderer.render(md));
    }

    #[test]
    fn test_toc_ids_match_rendered_ids() {
        let md = "## Getting Started!\n\n### Step 1. Install `cargo`\n\n#### What's *next*?\n";
        let html = MarkdownRenderer::new().render(md);
        let toc = extract_toc(md);
        assert_eq!(toc.len(), 3);
        for entry in toc {
            assert!(
                html.contains(&format!(r#"id="{}""#, entry.id)),
                "missing id {} in {}",
                entry.id,
                html
            );
        }
    }

    #[test]
    fn test_toc_ids_match_rendered_ids_across_document() {
        let md = "## Caveats[^1]\n\n### See [the docs][d] now\n\n```\n## not a heading\n```\n\nText.\n\n[^1]: A footnote.\n[d]: https://x.io\n";
        let html = MarkdownRenderer::new().render(md);
        let toc = extract_toc(md);
        assert_eq!(toc.len(), 2);
        for entry in toc {
            assert!(
                html.contains(&format!(r#"id="{}""#, entry.id)),
                "missing id {} in {}",
                entry.id,
                html
            );
        }
    }

    #[test]
    fn test_toc_ids_match_with_escaped_html() {
        let md = "## Hello <em>there</em>\n";
        let html = MarkdownRenderer::with_options(false).render(md);
        let toc = extract_toc_with(md, false);
        assert!(html.contains(&format!(r#"<h2 id="{}">"#, toc[0].id)), "{}", html);
    }
}
