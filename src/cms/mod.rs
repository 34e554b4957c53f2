//! CMS integration - document shapes and the query client

mod client;
mod document;

pub use client::{CmsClient, CmsError};
pub use document::{
    Banner, ContentSection, Document, DocumentData, QueryResponse, RichTextBlock, Span, SpanData,
};
