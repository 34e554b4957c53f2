//! Rich text conversion
//!
//! Converts CMS rich text bodies to plain text and to HTML. The HTML
//! conversion is an allow-list: text nodes are escaped, only a fixed set
//! of block and span tags is emitted, and hyperlink targets are filtered
//! to http/https. CMS content is never injected verbatim.

use crate::cms::{RichTextBlock, Span};
use crate::helpers::{escape, safe_href};

/// Plain-text projection of a rich text body
///
/// Block texts are joined with single spaces; formatting spans are ignored.
pub fn as_text(body: &[RichTextBlock]) -> String {
    body.iter()
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a rich text body to HTML
pub fn as_html(body: &[RichTextBlock]) -> String {
    let mut out = String::new();
    // "ul" or "ol" while a list is open
    let mut open_list: Option<&str> = None;

    for block in body {
        let list_tag = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        // Close the current list when leaving it or switching kinds
        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>\n", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>\n", tag));
            }
            open_list = list_tag;
        }

        match block.kind.as_str() {
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
                let level = &block.kind[7..8];
                out.push_str(&format!(
                    "<h{}>{}</h{}>\n",
                    level,
                    render_spans(&block.text, &block.spans),
                    level
                ));
            }
            "preformatted" => {
                out.push_str(&format!("<pre>{}</pre>\n", escape(&block.text)));
            }
            "list-item" | "o-list-item" => {
                out.push_str(&format!("<li>{}</li>\n", render_spans(&block.text, &block.spans)));
            }
            "image" => {
                if let Some(url) = block.url.as_deref().and_then(safe_href) {
                    out.push_str(&format!(
                        r#"<img src="{}" alt="{}">"#,
                        escape(url),
                        escape(&block.text)
                    ));
                    out.push('\n');
                }
            }
            // Paragraphs and unknown block kinds
            _ => {
                out.push_str(&format!("<p>{}</p>\n", render_spans(&block.text, &block.spans)));
            }
        }
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>\n", tag));
    }

    out
}

/// Apply inline spans to a block's text, escaping all text content
///
/// Span offsets are character indices. Spans are applied in start order;
/// overlapping or nested spans are not supported and the later span is
/// skipped.
fn render_spans(text: &str, spans: &[Span]) -> String {
    if spans.is_empty() {
        return escape(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sorted: Vec<&Span> = spans.iter().collect();
    sorted.sort_by_key(|s| (s.start, s.end));

    let mut out = String::with_capacity(text.len());
    let mut pos = 0usize;

    for span in sorted {
        if span.start < pos || span.end > chars.len() || span.start >= span.end {
            continue;
        }

        out.push_str(&escape(&collect(&chars[pos..span.start])));
        let inner = escape(&collect(&chars[span.start..span.end]));

        match span.kind.as_str() {
            "strong" => out.push_str(&format!("<strong>{}</strong>", inner)),
            "em" => out.push_str(&format!("<em>{}</em>", inner)),
            "hyperlink" => {
                let href = span
                    .data
                    .as_ref()
                    .and_then(|d| d.url.as_deref())
                    .and_then(safe_href);
                match href {
                    Some(url) => {
                        out.push_str(&format!(r#"<a href="{}">{}</a>"#, escape(url), inner))
                    }
                    None => out.push_str(&inner),
                }
            }
            _ => out.push_str(&inner),
        }

        pos = span.end;
    }

    out.push_str(&escape(&collect(&chars[pos..])));
    out
}

fn collect(chars: &[char]) -> String {
    chars.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::SpanData;

    fn span(start: usize, end: usize, kind: &str) -> Span {
        Span {
            start,
            end,
            kind: kind.to_string(),
            data: None,
        }
    }

    #[test]
    fn test_as_text_joins_blocks() {
        let body = vec![
            RichTextBlock::paragraph("one two"),
            RichTextBlock::paragraph("three"),
        ];
        assert_eq!(as_text(&body), "one two three");
    }

    #[test]
    fn test_paragraph_html() {
        let body = vec![RichTextBlock::paragraph("Hello <world>")];
        assert_eq!(as_html(&body), "<p>Hello &lt;world&gt;</p>\n");
    }

    #[test]
    fn test_heading_html() {
        let mut block = RichTextBlock::paragraph("Title");
        block.kind = "heading2".to_string();
        assert_eq!(as_html(&[block]), "<h2>Title</h2>\n");
    }

    #[test]
    fn test_strong_span() {
        let mut block = RichTextBlock::paragraph("make it bold");
        block.spans = vec![span(8, 12, "strong")];
        assert_eq!(as_html(&[block]), "<p>make it <strong>bold</strong></p>\n");
    }

    #[test]
    fn test_hyperlink_span_filters_scheme() {
        let mut block = RichTextBlock::paragraph("click here");
        let mut link = span(6, 10, "hyperlink");
        link.data = Some(SpanData {
            url: Some("javascript:alert(1)".to_string()),
        });
        block.spans = vec![link];
        // Unsafe target drops the anchor, keeps the text
        assert_eq!(as_html(&[block]), "<p>click here</p>\n");
    }

    #[test]
    fn test_hyperlink_span_keeps_https() {
        let mut block = RichTextBlock::paragraph("click here");
        let mut link = span(6, 10, "hyperlink");
        link.data = Some(SpanData {
            url: Some("https://example.com".to_string()),
        });
        block.spans = vec![link];
        assert_eq!(
            as_html(&[block]),
            "<p>click <a href=\"https://example.com\">here</a></p>\n"
        );
    }

    #[test]
    fn test_list_grouping() {
        let mut a = RichTextBlock::paragraph("first");
        a.kind = "list-item".to_string();
        let mut b = RichTextBlock::paragraph("second");
        b.kind = "list-item".to_string();
        let html = as_html(&[a, b]);
        assert_eq!(html, "<ul>\n<li>first</li>\n<li>second</li>\n</ul>\n");
    }

    #[test]
    fn test_overlapping_span_skipped() {
        let mut block = RichTextBlock::paragraph("abcdef");
        block.spans = vec![span(0, 4, "strong"), span(2, 6, "em")];
        assert_eq!(as_html(&[block]), "<p><strong>abcd</strong>ef</p>\n");
    }

    #[test]
    fn test_image_block() {
        let mut block = RichTextBlock::paragraph("diagram");
        block.kind = "image".to_string();
        block.url = Some("https://images.example/a.png".to_string());
        let html = as_html(&[block]);
        assert_eq!(
            html,
            "<img src=\"https://images.example/a.png\" alt=\"diagram\">\n"
        );
    }
}
