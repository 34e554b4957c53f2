//! Blog server
//!
//! Serves the listing API endpoint, the generated pages, and the
//! on-demand fallback for posts that were not known at build time.

use anyhow::Result;
use axum::{
    extract::{Path as UrlPath, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cms::{CmsClient, QueryResponse};
use crate::config::AppConfig;
use crate::content::{PostDetail, PostSummary};
use crate::generator::{self, is_valid_uid, post_output_path};
use crate::helpers::Locale;
use crate::pagination::{ListingEntry, Paginator, PostPage};
use crate::render;
use crate::Waypost;

/// Shared server state
///
/// Requests share nothing mutable except the listing regeneration
/// timestamp and the set of in-flight fallback renders.
pub struct ServerState {
    config: AppConfig,
    locale: Locale,
    client: CmsClient,
    public_dir: PathBuf,
    index_refreshed_at: Mutex<Option<Instant>>,
    rendering: Mutex<HashSet<String>>,
}

impl ServerState {
    /// Build server state from an application instance
    pub fn new(app: &Waypost) -> Self {
        let index_refreshed_at = if app.public_dir.join("index.html").exists() {
            Some(Instant::now())
        } else {
            None
        };

        Self {
            config: app.config.clone(),
            locale: Locale::from_tag(&app.config.language),
            client: CmsClient::new(&app.config),
            public_dir: app.public_dir.clone(),
            index_refreshed_at: Mutex::new(index_refreshed_at),
            rendering: Mutex::new(HashSet::new()),
        }
    }

    /// Build the CMS client for one request
    ///
    /// A preview ref carried by the request enables draft access for
    /// that request only; the shared client stays unmodified.
    fn request_client(&self, preview_ref: Option<&str>) -> CmsClient {
        match preview_ref {
            Some(preview_ref) => self.client.clone().with_preview_ref(preview_ref),
            None => self.client.clone(),
        }
    }
}

/// Start the blog server
pub async fn start(app: &Waypost, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(app));

    let router = Router::new()
        .route("/api/get_posts", any(get_posts_handler))
        .route("/", get(index_handler))
        .route("/post/:uid", get(post_handler))
        .fallback_service(ServeDir::new(&app.public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Generic server error response for failed CMS calls
#[derive(Debug)]
struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListingQuery {
    page: Option<u32>,

    /// Preview ref for draft access
    #[serde(rename = "ref")]
    preview_ref: Option<String>,
}

/// `GET /api/get_posts?page=<n>`
///
/// Returns `{ next_page, results }` with locale-formatted publication
/// dates. Any other method gets a 405 with `Allow: GET`. No bounds
/// checking: an out-of-range page returns whatever terminal page the CMS
/// yields.
async fn get_posts_handler(
    State(state): State<Arc<ServerState>>,
    method: Method,
    Query(query): Query<ListingQuery>,
) -> Result<Response, ApiError> {
    if method != Method::GET {
        return Ok(method_not_allowed());
    }

    let page = query.page.unwrap_or(1);
    let client = state.request_client(query.preview_ref.as_deref());
    let response = client.query_posts(page).await?;

    Ok(Json(listing_page(&response, state.locale)).into_response())
}

fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        "Method not allowed",
    )
        .into_response()
}

/// Map a raw CMS query page into the listing wire shape
fn listing_page(response: &QueryResponse, locale: Locale) -> PostPage {
    PostPage {
        next_page: response.next_page.clone(),
        results: response
            .results
            .iter()
            .map(|doc| ListingEntry::from_summary(&PostSummary::from_document(doc), locale))
            .collect(),
    }
}

/// `GET /` — the listing page, regenerated when older than the
/// revalidation window; a stale copy is served if regeneration fails
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let index_path = state.public_dir.join("index.html");

    let fresh = {
        let refreshed_at = state.index_refreshed_at.lock().await;
        refreshed_at
            .map(|at| at.elapsed().as_secs() < state.config.revalidate_secs)
            .unwrap_or(false)
    };

    if fresh {
        if let Ok(html) = tokio::fs::read_to_string(&index_path).await {
            return Html(html).into_response();
        }
    }

    match regenerate_index(&state).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!("Listing regeneration failed: {:#}", e);
            match tokio::fs::read_to_string(&index_path).await {
                Ok(stale) => Html(stale).into_response(),
                Err(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
                }
            }
        }
    }
}

async fn regenerate_index(state: &ServerState) -> Result<String> {
    let response = state.client.query_posts(1).await?;
    let paginator = Paginator::new(listing_page(&response, state.locale));
    let html = render::index_page(&state.config.title, &state.config.language, &paginator);

    generator::write_page(&state.public_dir.join("index.html"), &html)?;
    *state.index_refreshed_at.lock().await = Some(Instant::now());

    tracing::debug!("Listing page regenerated");
    Ok(html)
}

/// `GET /post/:uid` — serves the cached page when present; otherwise
/// returns the loading page and renders in the background
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    UrlPath(uid): UrlPath<String>,
) -> Response {
    if !is_valid_uid(&uid) {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    let path = post_output_path(&state.public_dir, &uid);
    if let Ok(html) = tokio::fs::read_to_string(&path).await {
        return Html(html).into_response();
    }

    // Fallback path: render once per uid, concurrent requests share the
    // in-flight render and keep polling the loading page.
    {
        let mut rendering = state.rendering.lock().await;
        if rendering.insert(uid.clone()) {
            let state = state.clone();
            let uid = uid.clone();
            tokio::spawn(async move {
                render_and_cache(state, uid).await;
            });
        }
    }

    (
        [(render::RENDER_PENDING_HEADER, "pending")],
        Html(render::loading_page(&state.config.language)),
    )
        .into_response()
}

async fn render_and_cache(state: Arc<ServerState>, uid: String) {
    let result = async {
        let doc = state.client.get_by_uid(&uid).await?;
        let detail = PostDetail::from_document(&doc);
        let html = render::post_page(&detail, state.locale, &state.config.language);
        generator::write_page(&post_output_path(&state.public_dir, &uid), &html)?;
        anyhow::Ok(())
    }
    .await;

    match result {
        Ok(()) => tracing::info!("Rendered and cached post: {}", uid),
        // Next request for this uid retries the render
        Err(e) => tracing::error!("Fallback render of {} failed: {:#}", uid, e),
    }

    state.rendering.lock().await.remove(&uid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::{Document, DocumentData};
    use chrono::TimeZone;

    fn test_state(public_dir: PathBuf) -> Arc<ServerState> {
        let app = Waypost {
            config: AppConfig {
                language: "pt-BR".to_string(),
                // Nothing listens here; CMS calls fail fast in tests
                api_endpoint: "http://127.0.0.1:1".to_string(),
                ..AppConfig::default()
            },
            base_dir: public_dir.clone(),
            public_dir,
        };
        Arc::new(ServerState::new(&app))
    }

    #[tokio::test]
    async fn test_non_get_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().to_path_buf());

        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let response =
                get_posts_handler(State(state.clone()), method, Query(ListingQuery::default()))
                    .await
                    .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");
        }
    }

    #[test]
    fn test_request_client_carries_preview_ref() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().to_path_buf());

        let client = state.request_client(Some("draft-ref"));
        assert_eq!(client.preview_ref(), Some("draft-ref"));
        assert_eq!(state.request_client(None).preview_ref(), None);
        // The shared client stays free of request-scoped refs
        assert_eq!(state.client.preview_ref(), None);
    }

    #[test]
    fn test_listing_query_parses_ref() {
        let query: ListingQuery =
            serde_json::from_value(serde_json::json!({ "page": 2, "ref": "draft-ref" })).unwrap();
        assert_eq!(query.page, Some(2));
        assert_eq!(query.preview_ref.as_deref(), Some("draft-ref"));
    }

    #[tokio::test]
    async fn test_method_not_allowed_body() {
        let response = method_not_allowed();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Method not allowed");
    }

    #[test]
    fn test_listing_page_maps_documents() {
        let response = QueryResponse {
            page: 1,
            total_pages: 2,
            next_page: Some("https://cms.example/page2".to_string()),
            results: vec![Document {
                id: "X1a".to_string(),
                uid: Some("hello".to_string()),
                doc_type: "posts".to_string(),
                first_publication_date: Some(
                    chrono::Utc.with_ymd_and_hms(2021, 3, 15, 0, 0, 0).unwrap(),
                ),
                data: DocumentData {
                    title: "Hello".to_string(),
                    subtitle: "sub".to_string(),
                    author: "Ada".to_string(),
                    ..DocumentData::default()
                },
            }],
        };

        let page = listing_page(&response, Locale::PtBr);
        assert_eq!(page.next_page.as_deref(), Some("https://cms.example/page2"));
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].uid, "hello");
        assert_eq!(page.results[0].first_publication_date.as_deref(), Some("15 mar 2021"));
        assert_eq!(page.results[0].data.author, "Ada");
    }

    #[tokio::test]
    async fn test_post_handler_serves_cached_page() {
        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().to_path_buf();
        let page_path = post_output_path(&public_dir, "cached");
        generator::write_page(&page_path, "<html>cached post</html>").unwrap();

        let state = test_state(public_dir);
        let response = post_handler(State(state), UrlPath("cached".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(render::RENDER_PENDING_HEADER).is_none());

        let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        assert_eq!(&body[..], b"<html>cached post</html>");
    }

    #[tokio::test]
    async fn test_post_handler_fallback_is_pending() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().to_path_buf());

        let response = post_handler(State(state), UrlPath("unknown-post".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(render::RENDER_PENDING_HEADER).unwrap(),
            "pending"
        );
    }

    #[tokio::test]
    async fn test_post_handler_rejects_bad_uid() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path().to_path_buf());

        let response = post_handler(State(state), UrlPath("..".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_serves_stale_copy_when_cms_is_down() {
        let dir = tempfile::tempdir().unwrap();
        let public_dir = dir.path().to_path_buf();
        generator::write_page(&public_dir.join("index.html"), "<html>stale listing</html>")
            .unwrap();

        let state = test_state(public_dir);
        // Force a regeneration attempt
        *state.index_refreshed_at.lock().await = None;

        let response = index_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        assert_eq!(&body[..], b"<html>stale listing</html>");
    }
}
