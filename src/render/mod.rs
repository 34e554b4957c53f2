//! Page rendering
//!
//! Builds the HTML for the listing page, post pages and the transitional
//! loading page, plus the estimated reading time shown on post pages.

use crate::cms::ContentSection;
use crate::content::{richtext, PostDetail};
use crate::helpers::{count_words, escape, format_short_date_opt, Locale};
use crate::pagination::{ListingEntry, Paginator};

/// Average reading speed used for the estimate, in words per minute
const WORDS_PER_MINUTE: usize = 200;

/// Response header marking a fallback render that is still pending
pub const RENDER_PENDING_HEADER: &str = "x-waypost-render";

/// Client-side load-more script
///
/// Mirrors the Paginator protocol: a page counter starting at 2, the
/// button gated on the next-page token, and a request sequence number so
/// a superseded response is discarded instead of applied out of order.
const LOAD_MORE_SCRIPT: &str = r#"
<script>
(function() {
    var page = 2;
    var seq = 0;
    var button = document.getElementById('load-more');
    if (!button) return;
    button.addEventListener('click', function() {
        var token = ++seq;
        fetch('/api/get_posts?page=' + page, { method: 'GET' })
            .then(function(res) { return res.json(); })
            .then(function(body) {
                if (token !== seq) return;
                page += 1;
                var list = document.getElementById('posts');
                body.results.forEach(function(post) {
                    var item = document.createElement('article');
                    var link = document.createElement('a');
                    link.href = '/post/' + encodeURIComponent(post.uid);
                    var title = document.createElement('strong');
                    title.textContent = post.data.title;
                    var subtitle = document.createElement('p');
                    subtitle.textContent = post.data.subtitle;
                    var meta = document.createElement('footer');
                    meta.textContent =
                        (post.first_publication_date || '') + ' | ' + post.data.author;
                    link.appendChild(title);
                    link.appendChild(subtitle);
                    link.appendChild(meta);
                    item.appendChild(link);
                    list.appendChild(item);
                });
                if (!body.next_page) button.remove();
            });
    });
})();
</script>
"#;

/// Polling script for the loading page
///
/// Refetches the same URL until the render-pending header disappears,
/// then swaps in the full document without a page reload.
const RESOLVE_SCRIPT: &str = r#"
<script>
(function() {
    function poll() {
        fetch(location.pathname).then(function(res) {
            if (res.headers.get('x-waypost-render') === 'pending') {
                setTimeout(poll, 1000);
                return;
            }
            res.text().then(function(html) {
                document.open();
                document.write(html);
                document.close();
            });
        }).catch(function() {
            setTimeout(poll, 2000);
        });
    }
    setTimeout(poll, 500);
})();
</script>
"#;

/// Estimated reading time in minutes: ceil(total words / 200)
///
/// Word count strips markup and collapses whitespace across all
/// sections' body text before splitting on spaces.
pub fn reading_minutes(content: &[ContentSection]) -> usize {
    let total_words: usize = content
        .iter()
        .map(|section| count_words(&richtext::as_text(&section.body)))
        .sum();

    total_words.div_ceil(WORDS_PER_MINUTE)
}

fn page_shell(title: &str, lang: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
        escape(lang),
        escape(title),
        body
    )
}

fn listing_item(entry: &ListingEntry) -> String {
    let date = entry.first_publication_date.as_deref().unwrap_or("");
    format!(
        r#"<article><a href="/post/{uid}">
<strong>{title}</strong>
<p>{subtitle}</p>
<footer><time>{date}</time> | <span>{author}</span></footer>
</a></article>
"#,
        uid = escape(&entry.uid),
        title = escape(&entry.data.title),
        subtitle = escape(&entry.data.subtitle),
        date = escape(date),
        author = escape(&entry.data.author),
    )
}

/// Render the listing page from the aggregator's server-rendered state
///
/// The load-more control is only present when the aggregated state has a
/// next page; the embedded script continues the same load protocol
/// client-side.
pub fn index_page(site_title: &str, lang: &str, paginator: &Paginator) -> String {
    let mut body = String::from("<main><section id=\"posts\">\n");
    for entry in paginator.entries() {
        body.push_str(&listing_item(entry));
    }
    body.push_str("</section>\n");

    if paginator.has_next_page() {
        body.push_str("<button type=\"button\" id=\"load-more\">Load more posts</button>\n");
    }
    body.push_str("</main>\n");
    body.push_str(LOAD_MORE_SCRIPT);

    page_shell(site_title, lang, &body)
}

/// Render a full post page
pub fn post_page(detail: &PostDetail, locale: Locale, lang: &str) -> String {
    let minutes = reading_minutes(&detail.content);
    let date = format_short_date_opt(&detail.first_publication_date, locale).unwrap_or_default();

    let mut body = String::from("<main>\n");

    if let Some(banner) = &detail.banner_url {
        body.push_str(&format!(
            "<img src=\"{}\" alt=\"Post banner\">\n",
            escape(banner)
        ));
    }

    body.push_str("<article>\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape(&detail.title)));
    body.push_str(&format!(
        "<div class=\"meta\"><time>{}</time> | <span>{}</span> | <span>{} min</span></div>\n",
        escape(&date),
        escape(&detail.author),
        minutes
    ));

    for section in &detail.content {
        body.push_str("<section>\n");
        body.push_str(&format!("<h2>{}</h2>\n", escape(&section.heading)));
        body.push_str(&richtext::as_html(&section.body));
        body.push_str("</section>\n");
    }

    body.push_str("</article>\n</main>\n");

    page_shell(&detail.title, lang, &body)
}

/// Render the transitional loading page served while a fallback render
/// is in flight
pub fn loading_page(lang: &str) -> String {
    let body = format!("<main><span class=\"loading\">Loading...</span></main>\n{}", RESOLVE_SCRIPT);
    page_shell("Loading...", lang, &body)
}
