//! CMS query client
//!
//! A thin adapter over the CMS document search API, configured once from
//! [`AppConfig`]. Failed calls propagate as [`CmsError`]; there are no
//! retries, timeouts or circuit breaking at this layer.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::cms::document::{Document, QueryResponse};
use crate::config::AppConfig;

/// Errors surfaced by CMS queries
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("no document with uid {uid:?}")]
    NotFound { uid: String },
}

/// Client bound to a CMS endpoint and credentials
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    page_size: u32,
    /// Preview ref for draft access, attached per request context
    preview_ref: Option<String>,
}

impl CmsClient {
    /// Create a client from the application configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.api_endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            page_size: config.page_size,
            preview_ref: None,
        }
    }

    /// Attach a preview ref taken from the incoming request context,
    /// enabling draft/preview access for this client
    pub fn with_preview_ref(mut self, preview_ref: impl Into<String>) -> Self {
        self.preview_ref = Some(preview_ref.into());
        self
    }

    /// The preview ref attached to this client, if any
    pub fn preview_ref(&self) -> Option<&str> {
        self.preview_ref.as_deref()
    }

    /// Query one page of documents of type `posts`
    pub async fn query_posts(&self, page: u32) -> Result<QueryResponse, CmsError> {
        let url = self.search_url(r#"[[at(document.type,"posts")]]"#, page, self.page_size);
        self.fetch(&url).await
    }

    /// Fetch a single post document by uid
    pub async fn get_by_uid(&self, uid: &str) -> Result<Document, CmsError> {
        // A quote or backslash would break out of the predicate string;
        // no document can carry such a uid, so treat it as absent.
        if uid.contains(['"', '\\']) {
            return Err(CmsError::NotFound {
                uid: uid.to_string(),
            });
        }

        let predicate = format!(r#"[[at(my.posts.uid,"{}")]]"#, uid);
        let url = self.search_url(&predicate, 1, 1);
        let response: QueryResponse = self.fetch(&url).await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound {
                uid: uid.to_string(),
            })
    }

    async fn fetch(&self, url: &str) -> Result<QueryResponse, CmsError> {
        tracing::debug!("CMS query: {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /// Build a document search URL for a predicate and page window
    fn search_url(&self, predicate: &str, page: u32, page_size: u32) -> String {
        let mut url = format!(
            "{}/documents/search?q={}&page={}&pageSize={}",
            self.endpoint,
            utf8_percent_encode(predicate, NON_ALPHANUMERIC),
            page,
            page_size,
        );

        if let Some(token) = &self.access_token {
            url.push_str("&access_token=");
            url.push_str(&utf8_percent_encode(token, NON_ALPHANUMERIC).to_string());
        }

        if let Some(preview_ref) = &self.preview_ref {
            url.push_str("&ref=");
            url.push_str(&utf8_percent_encode(preview_ref, NON_ALPHANUMERIC).to_string());
        }

        url
    }
}
