//! Static path generator
//!
//! At build time, enumerates the post identifiers known to the CMS
//! (single page, configured page size) and writes one static page per
//! identifier plus the listing page. Posts created after a build are
//! rendered on first request by the server fallback and cached through
//! the same [`write_page`] path.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cms::CmsClient;
use crate::content::{PostDetail, PostSummary};
use crate::helpers::Locale;
use crate::pagination::{ListingEntry, Paginator, PostPage};
use crate::render;
use crate::Waypost;

/// Static page generator
pub struct Generator {
    client: CmsClient,
    site_title: String,
    lang: String,
    locale: Locale,
    public_dir: PathBuf,
}

impl Generator {
    /// Create a generator for an application instance
    pub fn new(app: &Waypost) -> Self {
        Self {
            client: CmsClient::new(&app.config),
            site_title: app.config.title.clone(),
            lang: app.config.language.clone(),
            locale: Locale::from_tag(&app.config.language),
            public_dir: app.public_dir.clone(),
        }
    }

    /// Generate the listing page and one page per known post
    ///
    /// Returns the uids that were generated.
    pub async fn generate(&self) -> Result<Vec<String>> {
        let response = self.client.query_posts(1).await?;

        let entries: Vec<ListingEntry> = response
            .results
            .iter()
            .map(|doc| ListingEntry::from_summary(&PostSummary::from_document(doc), self.locale))
            .collect();

        let listing = PostPage {
            next_page: response.next_page.clone(),
            results: entries,
        };

        // The listing page is the aggregator's initial state
        let paginator = Paginator::new(listing);
        let index_html = render::index_page(&self.site_title, &self.lang, &paginator);
        write_page(&self.public_dir.join("index.html"), &index_html)?;

        let mut generated = Vec::new();
        for doc in &response.results {
            let Some(uid) = doc.uid.as_deref().filter(|u| is_valid_uid(u)) else {
                tracing::warn!("Skipping document {} without a usable uid", doc.id);
                continue;
            };

            let doc = self.client.get_by_uid(uid).await?;
            let detail = PostDetail::from_document(&doc);
            let html = render::post_page(&detail, self.locale, &self.lang);
            write_page(&post_output_path(&self.public_dir, uid), &html)?;

            tracing::debug!("Generated post page: {}", uid);
            generated.push(uid.to_string());
        }

        tracing::info!("Generated {} post pages", generated.len());
        Ok(generated)
    }
}

/// Output path for a post page: `<public>/post/<uid>/index.html`
pub fn post_output_path(public_dir: &Path, uid: &str) -> PathBuf {
    public_dir.join("post").join(uid).join("index.html")
}

/// Whether a uid is usable as a single path segment
pub fn is_valid_uid(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains(['/', '\\'])
}

/// Write a rendered page, creating parent directories as needed
pub fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_output_path() {
        let path = post_output_path(Path::new("public"), "my-post");
        assert_eq!(path, Path::new("public/post/my-post/index.html"));
    }

    #[test]
    fn test_is_valid_uid() {
        assert!(is_valid_uid("my-post"));
        assert!(!is_valid_uid(""));
        assert!(!is_valid_uid(".."));
        assert!(!is_valid_uid("a/b"));
        assert!(!is_valid_uid("a\\b"));
    }

    #[test]
    fn test_write_page_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = post_output_path(dir.path(), "deep-post");
        write_page(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
