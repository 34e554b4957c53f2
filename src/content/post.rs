//! Post display types
//!
//! Minimal display shapes mapped from raw CMS documents. Both types are
//! immutable once mapped; they live for one response or render cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cms::{ContentSection, Document};

/// A post as shown in the listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    /// URL-friendly identifier
    pub uid: String,

    /// Publication timestamp, null for unpublished documents
    pub first_publication_date: Option<DateTime<Utc>>,

    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl PostSummary {
    /// Map a raw CMS document into a summary
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone(),
            subtitle: doc.data.subtitle.clone(),
            author: doc.data.author.clone(),
        }
    }
}

/// A post as shown on its own page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,

    /// Banner image URL
    pub banner_url: Option<String>,

    /// Ordered content sections, fetch order preserved
    pub content: Vec<ContentSection>,
}

impl PostDetail {
    /// Map a raw CMS document into a detail view
    pub fn from_document(doc: &Document) -> Self {
        Self {
            uid: doc.uid.clone().unwrap_or_default(),
            first_publication_date: doc.first_publication_date,
            title: doc.data.title.clone(),
            subtitle: doc.data.subtitle.clone(),
            author: doc.data.author.clone(),
            banner_url: doc.data.banner.as_ref().map(|b| b.url.clone()),
            content: doc.data.content.clone(),
        }
    }
}
