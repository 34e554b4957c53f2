//! Raw CMS document shapes
//!
//! These structs mirror the JSON returned by the headless CMS document
//! API. They are deserialized as-is and mapped into display types by the
//! content module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of a document query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub total_pages: u32,

    /// Opaque URL of the next page, null on the terminal page
    #[serde(default)]
    pub next_page: Option<String>,

    #[serde(default)]
    pub results: Vec<Document>,
}

/// A single CMS document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    /// URL-friendly identifier; drafts may not have one yet
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub doc_type: String,

    pub first_publication_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub data: DocumentData,
}

/// The `data` object of a post document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner: Option<Banner>,
    pub content: Vec<ContentSection>,
}

/// Banner image reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
}

/// One content section: a heading plus a rich text body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default)]
    pub heading: String,

    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// A rich text block
///
/// `kind` is one of the CMS block types ("paragraph", "heading1".."heading6",
/// "list-item", "o-list-item", "preformatted", "image"). Unknown kinds are
/// rendered as paragraphs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image URL for "image" blocks
    #[serde(default)]
    pub url: Option<String>,
}

impl RichTextBlock {
    /// Create a plain paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: text.into(),
            spans: Vec::new(),
            url: None,
        }
    }
}

/// An inline formatting span over a block's text, in character offsets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub data: Option<SpanData>,
}

/// Extra span payload (hyperlink target)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
}
