//! HTML helpers for document content: escaping and title derivation.

use crate::models::DEFAULT_TITLE;
use regex::Regex;
use std::sync::OnceLock;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn first_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(?:h1|h2|h3|p)(?:\s[^>]*)?>(.*?)</(?:h1|h2|h3|p)\s*>")
            .expect("title pattern compiles")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern compiles"))
}

/// Plain text of an HTML fragment, with whitespace runs collapsed.
pub fn text_content(html: &str) -> String {
    let stripped = tag_re().replace_all(html, " ");
    html_unescape(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first `h1`, `h2`, `h3` or `p` element, if it has any.
pub fn first_block_text(html: &str) -> Option<String> {
    first_block_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|inner| text_content(inner.as_str()))
        .filter(|text| !text.is_empty())
}

/// Title of a document: the first block's text, or the default title.
pub fn derive_title(html: &str) -> String {
    first_block_text(html).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_first_heading() {
        assert_eq!(derive_title("<h1>Week 1</h1><p>intro</p>"), "Week 1");
        assert_eq!(derive_title("<h2 class=\"x\">  Spaced  </h2>"), "Spaced");
    }

    #[test]
    fn test_title_takes_first_block_in_document_order() {
        assert_eq!(derive_title("<p>Lead paragraph</p><h1>Later heading</h1>"), "Lead paragraph");
    }

    #[test]
    fn test_title_strips_inline_markup_and_entities() {
        assert_eq!(
            derive_title("<h1><strong>Cats</strong> &amp; <em>dogs</em></h1>"),
            "Cats & dogs"
        );
    }

    #[test]
    fn test_title_does_not_match_similar_tags() {
        assert_eq!(derive_title("<pre>code</pre><h3>Real</h3>"), "Real");
    }

    #[test]
    fn test_title_defaults_when_empty() {
        assert_eq!(derive_title(""), DEFAULT_TITLE);
        assert_eq!(derive_title("<h1></h1><p>body</p>"), DEFAULT_TITLE);
        assert_eq!(derive_title("<div>no blocks</div>"), DEFAULT_TITLE);
    }

    #[test]
    fn test_escape_round_trip_through_text_content() {
        let raw = "a < b & \"c\" 'd'";
        assert_eq!(text_content(&html_escape(raw)), raw);
    }
}
