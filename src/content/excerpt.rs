//! Plain-text excerpts from markdown bodies

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`[^`]*`").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[[^\]]*\]\([^)]*\)").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref FORMATTING: Regex = Regex::new(r"[#*_~`]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strip markdown syntax, leaving readable text on a single line
pub fn strip_markdown(markdown: &str) -> String {
    let text = CODE_BLOCK.replace_all(markdown, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = IMAGE.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = FORMATTING.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Plain-text excerpt of at most `max_len` characters, cut at a word boundary
pub fn excerpt(markdown: &str, max_len: usize) -> String {
    let stripped = strip_markdown(markdown);
    if stripped.chars().count() <= max_len {
        return stripped;
    }

    let cut: String = stripped.chars().take(max_len).collect();
    // Drop the trailing partial word
    let trimmed = match cut.rfind(char::is_whitespace) {
        Some(pos) => cut[..pos].trim_end(),
        None => cut.as_str(),
    };
    format!("{}...", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown() {
        let md = "# Title\n\nSome **bold** and `code` with a [link](https://x.io).\n\n![img](a.png)\n\n```rust\nfn main() {}\n```\nEnd ~~old~~";
        assert_eq!(
            strip_markdown(md),
            "Title Some bold and with a link. End old"
        );
    }

    #[test]
    fn test_short_excerpt_untouched() {
        assert_eq!(excerpt("Just *a* line", 160), "Just a line");
    }

    #[test]
    fn test_excerpt_cuts_at_word_boundary() {
        let md = "alpha beta gamma delta";
        assert_eq!(excerpt(md, 13), "alpha beta...");
        assert_eq!(excerpt(md, 11), "alpha beta...");
    }
}
