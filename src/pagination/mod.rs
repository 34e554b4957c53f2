//! Pagination aggregator
//!
//! Merges an initial server-rendered page of posts with subsequently
//! fetched pages, tracking whether more pages exist. The listing page is
//! rendered from this state (`render::index_page`), and the script it
//! embeds continues the same load protocol client-side. Fetches are
//! explicitly sequenced: each load is tagged with a monotonically
//! increasing token and only the newest outstanding response may be
//! applied, so overlapping loads cannot interleave out of order.
//!
//! Accumulated entries are append-only in fetch order. Duplicate uids
//! across pages are possible if the CMS reorders data between fetches;
//! they are deliberately not deduplicated.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::content::PostSummary;
use crate::helpers::{format_short_date_opt, Locale};

/// One page of the listing wire format: `{ next_page, results }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    /// Opaque next-page token, null on the terminal page
    pub next_page: Option<String>,
    pub results: Vec<ListingEntry>,
}

/// A post entry in the listing wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingEntry {
    pub uid: String,
    /// Locale-formatted publication date, null when unpublished
    pub first_publication_date: Option<String>,
    pub data: EntryData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryData {
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

impl ListingEntry {
    /// Build a wire entry from a mapped summary, formatting the date for
    /// the given locale
    pub fn from_summary(summary: &PostSummary, locale: Locale) -> Self {
        Self {
            uid: summary.uid.clone(),
            first_publication_date: format_short_date_opt(
                &summary.first_publication_date,
                locale,
            ),
            data: EntryData {
                title: summary.title.clone(),
                subtitle: summary.subtitle.clone(),
                author: summary.author.clone(),
            },
        }
    }
}

/// Token identifying one in-flight load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Accumulates listing pages for one browsing session
#[derive(Debug)]
pub struct Paginator {
    /// Page number the next load will request
    next_page_number: u32,
    has_next: bool,
    entries: Vec<ListingEntry>,
    latest_token: u64,
}

impl Paginator {
    /// Start from a server-rendered first page; the next load requests
    /// page 2
    pub fn new(initial: PostPage) -> Self {
        Self {
            next_page_number: 2,
            has_next: initial.next_page.is_some(),
            entries: initial.results,
            latest_token: 0,
        }
    }

    /// Whether the most recently applied page had a next-page token
    pub fn has_next_page(&self) -> bool {
        self.has_next
    }

    /// Accumulated entries, append-only in fetch order
    pub fn entries(&self) -> &[ListingEntry] {
        &self.entries
    }

    /// Begin a load: returns the token for this request and the page
    /// number to fetch
    ///
    /// Beginning a new load supersedes any still-outstanding one.
    pub fn begin_load(&mut self) -> (RequestToken, u32) {
        self.latest_token += 1;
        (RequestToken(self.latest_token), self.next_page_number)
    }

    /// Apply a fetched page
    ///
    /// Returns false and leaves state untouched when the token has been
    /// superseded by a later `begin_load`.
    pub fn apply(&mut self, token: RequestToken, page: PostPage) -> bool {
        if token.0 != self.latest_token {
            tracing::debug!("Discarding superseded page response");
            return false;
        }

        self.has_next = page.next_page.is_some();
        self.entries.extend(page.results);
        self.next_page_number += 1;
        true
    }

    /// Load one more page through the given fetch function
    ///
    /// Returns whether the fetched page was applied (a concurrent
    /// `begin_load` may have superseded this one while awaiting).
    pub async fn load_more_with<F, Fut>(&mut self, fetch: F) -> anyhow::Result<bool>
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = anyhow::Result<PostPage>>,
    {
        let (token, page_number) = self.begin_load();
        let page = fetch(page_number).await?;
        Ok(self.apply(token, page))
    }
}
