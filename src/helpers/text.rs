//! Text helper functions: slugs, word counts and reading time

use lazy_static::lazy_static;
use regex::Regex;

/// Average reading speed used by [`read_time`]
pub const WORDS_PER_MINUTE: usize = 200;

/// Elements that separate words when their tags are removed
const BLOCK_TAGS: &[&str] = &[
    "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section",
    "table", "tbody", "td", "th", "thead", "tr", "ul",
];

lazy_static! {
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<\s*/?\s*([a-zA-Z][a-zA-Z0-9]*)?[^>]*>").unwrap();
}

/// Generate a URL-safe slug
///
/// Lowercases, drops non-ASCII characters, collapses every run of other
/// characters into a single hyphen and trims hyphens from both ends.
///
/// # Examples
/// ```ignore
/// slugify("Hello, Wörld!") // -> "hello-wrld"
/// ```
pub fn slugify(s: &str) -> String {
    let ascii: String = s.to_lowercase().chars().filter(char::is_ascii).collect();
    NON_ALNUM
        .replace_all(&ascii, "-")
        .trim_matches('-')
        .to_string()
}

/// Count whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounding any remainder up
pub fn read_time(text: &str) -> usize {
    reading_minutes(word_count(text))
}

/// Minutes needed to read `words` words
pub fn reading_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Remove HTML tags, keeping the text between them.
///
/// Block-level tags become a space; inline tags vanish, so
/// `<strong>word</strong>,` is still a single word.
pub fn strip_html(s: &str) -> String {
    HTML_TAG
        .replace_all(s, |caps: &regex::Captures| {
            let block = caps
                .get(1)
                .map(|name| BLOCK_TAGS.contains(&name.as_str().to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if block {
                " "
            } else {
                ""
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust & Go: a -- comparison!  "), "rust-go-a-comparison");
        assert_eq!(slugify("Hello, Wörld!"), "hello-wrld");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in [
            "Hello World",
            "Ünïcödé   títle",
            "--leading and trailing--",
            "already-a-slug",
            "MiXeD_case__Under_scores",
            "",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {:?}", input);
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn test_read_time() {
        assert_eq!(read_time(""), 0);
        assert_eq!(read_time(&words(1)), 1);
        assert_eq!(read_time(&words(200)), 1);
        assert_eq!(read_time(&words(201)), 2);
        assert_eq!(read_time(&words(400)), 2);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(word_count("  one\ttwo\n\nthree  "), 3);
    }

    #[test]
    fn test_strip_html() {
        let text = strip_html("<h1>Title</h1><p>Some <em>body</em> text</p>");
        assert_eq!(word_count(&text), 4);
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_strip_html_keeps_inline_words_whole() {
        let html = "<p><strong>bold</strong>, <a href=\"/x\">link</a>.</p>";
        let words: Vec<_> = strip_html(html).split_whitespace().map(str::to_string).collect();
        assert_eq!(words, vec!["bold,", "link."]);

        let code = r#"<pre><span style="color:#b48ead;">fn</span><span> </span><span>main</span><span>()</span></pre>"#;
        assert_eq!(word_count(&strip_html(code)), 2);
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(reading_minutes(0), 0);
        assert_eq!(reading_minutes(150), 1);
        assert_eq!(reading_minutes(310), 2);
    }
}
