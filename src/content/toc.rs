//! Table of contents extraction and heading anchor ids

use lazy_static::lazy_static;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;

use super::markdown::{filter_raw_html, markdown_options};
use super::TocEntry;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
}

/// Derive the anchor id for a heading from its plain text.
///
/// Both the renderer and the TOC extractor go through this function, so a
/// TOC link always points at an id the rendered page contains.
pub fn heading_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, "");
    let hyphenated = WHITESPACE.replace_all(&stripped, "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Extract level 2-4 headings from a markdown body, raw HTML passed through
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    extract_toc_with(markdown, true)
}

/// Extract level 2-4 ATX headings from a markdown body.
///
/// The body is parsed whole, with the renderer's options and raw HTML
/// handling, so footnotes, reference links and code fences resolve exactly
/// as they do in the rendered page.
pub fn extract_toc_with(markdown: &str, raw_html: bool) -> Vec<TocEntry> {
    let mut toc = Vec::new();
    // (level, heading text) of the ATX heading being read
    let mut current: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(markdown, markdown_options()).into_offset_iter() {
        match filter_raw_html(event, raw_html) {
            Event::Start(Tag::Heading { level, .. }) => {
                let level = level as u8;
                if (2..=4).contains(&level) && is_atx(&markdown[range]) {
                    current = Some((level, String::new()));
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    let title = text.trim().to_string();
                    toc.push(TocEntry {
                        id: heading_id(&title),
                        title,
                        level,
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, buf)) = current.as_mut() {
                    buf.push_str(&text);
                }
            }
            _ => {}
        }
    }

    toc
}

/// `#`-prefixed heading source, as opposed to a setext underline heading
fn is_atx(source: &str) -> bool {
    source.trim_start().starts_with('#')
}
