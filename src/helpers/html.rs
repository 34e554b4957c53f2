//! HTML helper functions

/// Escape HTML special characters
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string, replacing each tag with a space so
/// adjacent words stay separated
pub fn strip_tags(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => {
                in_tag = true;
                result.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count words in a plain-text string
///
/// Markup is stripped and whitespace collapsed first, then the result is
/// split on single spaces. Approximate: sensitive to punctuation and
/// non-Latin scripts.
pub fn count_words(s: &str) -> usize {
    let text = collapse_whitespace(&strip_tags(s));
    if text.is_empty() {
        0
    } else {
        text.split(' ').count()
    }
}

/// Filter a hyperlink target down to http/https URLs
///
/// CMS content is not trusted verbatim; anything else (javascript:,
/// data:, relative paths) is dropped.
pub fn safe_href(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>World</b></p>").trim(), "Hello  World");
        assert_eq!(collapse_whitespace(&strip_tags("one<br>two")), "one two");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  c "), "a b c");
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("one two three"), 3);
        assert_eq!(count_words("one<br>two"), 2);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("https://example.com/x"), Some("https://example.com/x"));
        assert_eq!(safe_href(" http://example.com "), Some("http://example.com"));
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href("/relative"), None);
    }
}
