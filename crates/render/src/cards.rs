use chrono::{DateTime, Utc};
use domain::{Channel, CommentId, CommentView, Video, VideoId};

use crate::format::{avatar_placeholder, format_duration, format_number, time_ago};
use crate::{encode_query, html_escape};

const UNKNOWN_CHANNEL: &str = "Unknown Channel";
const UNTITLED_VIDEO: &str = "Untitled Video";

const LIKE_ICON: &str = r#"<svg viewBox="0 0 24 24"><path d="M1 21h4V9H1v12zM23 10c0-1.1-.9-2-2-2h-6.31l.95-4.57.03-.32c0-.41-.17-.79-.44-1.06L14.17 1 7.59 7.59C7.22 7.95 7 8.45 7 9v10c0 1.1.9 2 2 2h9c.83 0 1.54-.5 1.84-1.22l3.02-7.05c.09-.23.14-.47.14-.73v-2z"/></svg>"#;

pub fn watch_href(id: &VideoId) -> String {
    format!("/watch?v={}", encode_query(id.as_str()))
}

fn thumbnail(video: &Video, fallback_size: &str) -> String {
    video.thumbnail_url.clone().unwrap_or_else(|| {
        format!(
            "https://i.ytimg.com/vi/{}/{fallback_size}.jpg",
            encode_query(video.id.as_str())
        )
    })
}

fn channel_name(video: &Video) -> &str {
    if video.channel_title.is_empty() {
        UNKNOWN_CHANNEL
    } else {
        &video.channel_title
    }
}

fn title(video: &Video) -> &str {
    if video.title.is_empty() {
        UNTITLED_VIDEO
    } else {
        &video.title
    }
}

fn uploaded(video: &Video, now: DateTime<Utc>) -> String {
    video
        .published_at
        .map(|at| time_ago(at, now))
        .unwrap_or_default()
}

/// Grid card used on the home feed
pub fn video_card(video: &Video, now: DateTime<Utc>) -> String {
    let href = watch_href(&video.id);
    let channel = html_escape(channel_name(video));
    let avatar = video
        .channel_avatar
        .clone()
        .unwrap_or_else(|| avatar_placeholder(channel_name(video)));
    let title = html_escape(title(video));
    let category = video
        .category_id
        .as_deref()
        .map(|c| format!(r#" data-category="{}""#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r##"<div class="video-card"{category}>
    <a href="{href}" class="video-thumbnail">
        <img src="{thumb}" alt="{title}" loading="lazy">
        <span class="video-duration">{duration}</span>
    </a>
    <div class="video-details">
        <a href="#" class="channel-avatar"><img src="{avatar}" alt="{channel}"></a>
        <div class="video-meta">
            <a href="{href}"><h3 class="video-title">{title}</h3></a>
            <div class="video-info">
                <span>{channel}</span>
                <span>{views} views</span>
                <span>•</span>
                <span>{uploaded}</span>
            </div>
        </div>
    </div>
</div>"##,
        thumb = html_escape(&thumbnail(video, "hq720")),
        duration = format_duration(video.duration.as_deref()),
        avatar = html_escape(&avatar),
        views = format_number(video.view_count),
        uploaded = uploaded(video, now),
    )
}

/// Row card used on the search results page. Detail fields missing from the
/// join render as `N/A` views and a blank duration.
pub fn search_result_card(video: &Video, now: DateTime<Utc>) -> String {
    let href = watch_href(&video.id);
    let channel = html_escape(channel_name(video));
    let title = html_escape(title(video));
    let views = video
        .view_count
        .map(|n| format_number(Some(n)))
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        r#"<div class="search-result-card">
    <a href="{href}" class="search-thumbnail">
        <img src="{thumb}" alt="{title}" loading="lazy">
        <span class="video-duration">{duration}</span>
    </a>
    <div class="search-details">
        <a href="{href}"><h3 class="search-video-title">{title}</h3></a>
        <div class="search-video-stats">
            <span>{views} views</span>
            <span>•</span>
            <span>{uploaded}</span>
        </div>
        <div class="search-channel-info">
            <img src="{avatar}" alt="{channel}" class="channel-avatar-sm" loading="lazy">
            <span>{channel}</span>
        </div>
        <p class="search-video-description">{description}</p>
    </div>
</div>"#,
        thumb = html_escape(&thumbnail(video, "mqdefault")),
        duration = format_duration(video.duration.as_deref()),
        uploaded = uploaded(video, now),
        avatar = html_escape(&avatar_placeholder(channel_name(video))),
        description = html_escape(&video.description),
    )
}

/// Compact card in the watch page sidebar
pub fn recommendation_card(video: &Video, now: DateTime<Utc>) -> String {
    let title = html_escape(title(video));
    format!(
        r#"<a href="{href}" class="rec-video-card">
    <img src="{thumb}" alt="{title}" class="rec-video-thumbnail" loading="lazy">
    <div class="rec-video-meta">
        <h3 class="rec-video-title">{title}</h3>
        <div class="rec-video-info">
            <p>{channel}</p>
            <p>{uploaded}</p>
        </div>
    </div>
</a>"#,
        href = watch_href(&video.id),
        thumb = html_escape(&thumbnail(video, "mqdefault")),
        channel = html_escape(channel_name(video)),
        uploaded = uploaded(video, now),
    )
}

/// Channel header under the player. Falls back to the channel title carried
/// by the video when channel details are unavailable.
pub fn channel_block(video: &Video, channel: Option<&Channel>) -> String {
    let name = channel
        .map(|c| c.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| channel_name(video));
    let avatar = channel
        .and_then(|c| c.avatar_url.clone())
        .unwrap_or_else(|| avatar_placeholder(name));
    let subscribers = channel
        .and_then(|c| c.subscriber_count)
        .map(|n| format!("{} subscribers", format_number(Some(n))))
        .unwrap_or_default();

    format!(
        r#"<div class="channel-info">
    <img id="channelAvatar" src="{avatar}" alt="{name}">
    <div>
        <p id="channelName">{name}</p>
        <p id="subscriberCount">{subscribers}</p>
    </div>
</div>"#,
        avatar = html_escape(&avatar),
        name = html_escape(name),
    )
}

/// Element id of a comment, also used as the redirect fragment after a like
pub fn comment_anchor(id: &CommentId) -> String {
    format!("c-{}", encode_query(id.as_str()))
}

/// A single comment with its like toggle. The like button posts back to the
/// server; the count shown is derived from the reported count and the flag.
pub fn comment_element(video_id: &VideoId, view: &CommentView, now: DateTime<Utc>) -> String {
    let snippet = view.comment.snippet();
    let id = html_escape(view.comment.id().as_str());
    let anchor = html_escape(&comment_anchor(view.comment.id()));
    let author = html_escape(&snippet.author_display_name);
    let avatar = if snippet.author_profile_image_url.is_empty() {
        avatar_placeholder(&snippet.author_display_name)
    } else {
        snippet.author_profile_image_url.clone()
    };
    let text = html_escape(&snippet.text_display).replace('\n', "<br>");
    let liked_class = if view.liked { " liked" } else { "" };
    let provenance = if view.comment.is_local() { "local" } else { "remote" };

    format!(
        r#"<div class="comment" id="{anchor}" data-comment-id="{id}" data-source="{provenance}">
    <img src="{avatar}" alt="{author}" loading="lazy">
    <div class="comment-body">
        <p class="comment-author">{author} • {ago}</p>
        <p class="comment-text">{text}</p>
        <div class="comment-actions">
            <form method="post" action="/watch/likes">
                <input type="hidden" name="v" value="{video}">
                <input type="hidden" name="comment_id" value="{id}">
                <button type="submit" class="like-btn{liked_class}">{LIKE_ICON}</button>
            </form>
            <span class="like-count">{likes}</span>
            <span>Reply</span>
        </div>
    </div>
</div>"#,
        avatar = html_escape(&avatar),
        ago = time_ago(snippet.published_at, now),
        video = html_escape(video_id.as_str()),
        likes = format_number(Some(view.like_count())),
    )
}
