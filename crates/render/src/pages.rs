use chrono::{DateTime, Utc};
use domain::{Channel, CommentView, Video, VideoId};

use crate::cards::{channel_block, comment_element};
use crate::format::format_number;
use crate::{encode_query, html_escape, message};

/// Category tabs on the home feed: (query value, label)
pub const CATEGORIES: &[(&str, &str)] = &[
    ("all", "All"),
    ("gaming", "Gaming"),
    ("music", "Music"),
    ("news", "News"),
    ("sports", "Sports"),
    ("learning", "Learning"),
    ("cooking", "Cooking"),
];

/// Shared page shell with the header search form
pub fn layout(title: &str, query: Option<&str>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header class="header">
        <a href="/" class="logo">YouTube</a>
        <form class="search-container" action="/search" method="get">
            <input id="searchInput" type="text" name="q" placeholder="Search" value="{query}">
            <button type="submit">Search</button>
        </form>
    </header>
    <main id="mainContent">
{body}
    </main>
</body>
</html>"#,
        title = html_escape(title),
        query = html_escape(query.unwrap_or_default()),
    )
}

pub fn home_page(active_category: &str, grid: &str) -> String {
    let tabs: String = CATEGORIES
        .iter()
        .map(|(value, label)| {
            let active = if *value == active_category { " active" } else { "" };
            format!(
                r#"<a href="/?category={}" class="category-tab{active}" data-category="{value}">{label}</a>"#,
                encode_query(value)
            )
        })
        .collect();

    let body = format!(
        r#"<nav id="categoryTabs" class="category-tabs">{tabs}</nav>
<div id="videoGrid" class="video-grid">
{grid}
</div>"#
    );
    layout("YouTube", None, &body)
}

/// Search results page. With no query, only a prompt is shown.
pub fn search_page(query: Option<&str>, results: &str) -> String {
    let heading = match query {
        Some(q) => format!("Search results for \"{q}\""),
        None => "Please enter a search term.".to_string(),
    };
    let body = format!(
        r#"<h2 id="searchQueryHeading">{}</h2>
<div id="searchResults" class="search-results">
{results}
</div>"#,
        html_escape(&heading)
    );
    layout("Search - YouTube", query, &body)
}

/// Everything the watch page displays once the primary fetches resolved
pub struct WatchPage<'a> {
    pub video: &'a Video,
    pub channel: Option<&'a Channel>,
    pub comments: &'a [CommentView],
    pub notice: Option<&'a str>,
}

pub fn watch_page(page: &WatchPage<'_>, now: DateTime<Utc>) -> String {
    let video = page.video;
    let id = html_escape(video.id.as_str());
    let comments: String = page
        .comments
        .iter()
        .map(|view| comment_element(&video.id, view, now))
        .collect::<Vec<_>>()
        .join("\n");
    let notice = page
        .notice
        .map(|text| message("warning-text", text))
        .unwrap_or_default();

    let body = format!(
        r#"<div class="watch-layout">
    <section class="primary">
        <iframe id="videoPlayer" src="https://www.youtube.com/embed/{id}?autoplay=1" allowfullscreen></iframe>
        <h1 id="videoTitle">{title}</h1>
        {channel}
        <span id="likeCount">{likes}</span>
        <p id="videoDescription">{description}</p>
        <h3 id="commentCount">{comment_count} Comments</h3>
        {notice}
        <form class="comment-form" method="post" action="/watch/comments">
            <input type="hidden" name="v" value="{id}">
            <input id="newCommentInput" type="text" name="text" placeholder="Add a comment..." required>
            <div class="comment-buttons">
                <a href="{cancel}">Cancel</a>
                <button id="submitCommentBtn" type="submit">Comment</button>
            </div>
        </form>
        <div id="commentsContainer">
{comments}
        </div>
    </section>
    <aside id="recommendations" data-src="{recs_src}">
        {loading}
    </aside>
</div>
<script>
    (function () {{
        var el = document.getElementById('recommendations');
        fetch(el.dataset.src)
            .then(function (r) {{ return r.text(); }})
            .then(function (html) {{ el.innerHTML = html; }})
            .catch(function () {{ el.innerHTML = '<p>No recommendations found.</p>'; }});
    }})();
</script>"#,
        title = html_escape(&video.title),
        channel = channel_block(video, page.channel),
        likes = format_number(video.like_count),
        description = html_escape(&video.description),
        comment_count = format_number(Some(page.comments.len() as u64)),
        cancel = crate::cards::watch_href(&video.id),
        recs_src = recommendations_href(&video.id),
        loading = message("loading-text", "Loading recommendations..."),
    );
    layout(&video.title, None, &body)
}

pub fn recommendations_href(id: &VideoId) -> String {
    format!("/watch/recommendations?v={}", encode_query(id.as_str()))
}

/// Full page carrying only an error heading
pub fn error_page(text: &str) -> String {
    layout(
        "Error - YouTube",
        None,
        &format!("<h1>Error: {}</h1>", html_escape(text)),
    )
}
