//! Reshape API responses into display records.

use std::collections::HashMap;

use domain::{Channel, CommentId, RemoteComment, Video, VideoId};

use crate::types::{
    ChannelResource, CommentThreadListResponse, SearchListResponse, SearchResult, VideoListResponse,
    VideoResource,
};

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Video ids of the search hits, in result order. Hits that are not videos
/// (channels, playlists) carry no video id and are skipped.
pub fn search_video_ids(search: &SearchListResponse) -> Vec<VideoId> {
    search
        .items
        .iter()
        .filter_map(|item| item.id.video_id.as_deref())
        .map(VideoId::from)
        .collect()
}

fn video_from_search(item: SearchResult) -> Option<Video> {
    let id = VideoId::new(item.id.video_id?);
    let snippet = item.snippet.unwrap_or_default();
    Some(Video {
        id,
        thumbnail_url: snippet.thumbnails.best_medium().map(str::to_string),
        title: snippet.title,
        description: snippet.description,
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
        channel_avatar: None,
        published_at: snippet.published_at,
        category_id: None,
        duration: None,
        view_count: None,
        like_count: None,
        comment_count: None,
    })
}

/// Copy statistics and content details from a detail resource onto a video
fn apply_details(video: &mut Video, details: &VideoResource) {
    if let Some(stats) = &details.statistics {
        video.view_count = parse_count(stats.view_count.as_deref());
        video.like_count = parse_count(stats.like_count.as_deref());
        video.comment_count = parse_count(stats.comment_count.as_deref());
    }
    if let Some(content) = &details.content_details {
        video.duration = content.duration.clone();
    }
    if let Some(snippet) = &details.snippet {
        video.category_id = video.category_id.take().or_else(|| snippet.category_id.clone());
    }
}

/// Search hits as videos, without detail fields
pub fn videos_from_search(search: SearchListResponse) -> Vec<Video> {
    search.items.into_iter().filter_map(video_from_search).collect()
}

/// Join search hits with the batched detail response by video id.
///
/// Search order is kept. Every hit with a matching detail resource gets its
/// fields, including repeated hits; a hit without one keeps them absent.
pub fn join_search_with_details(
    search: SearchListResponse,
    details: VideoListResponse,
) -> Vec<Video> {
    let by_id: HashMap<VideoId, VideoResource> = details
        .items
        .into_iter()
        .map(|resource| (VideoId::new(resource.id.clone()), resource))
        .collect();

    videos_from_search(search)
        .into_iter()
        .map(|mut video| {
            if let Some(resource) = by_id.get(&video.id) {
                apply_details(&mut video, resource);
            }
            video
        })
        .collect()
}

/// Build a video entirely from a detail resource (snippet, statistics,
/// content details as requested)
pub fn video_from_resource(resource: VideoResource) -> Video {
    let snippet = resource.snippet.unwrap_or_default();
    let stats = resource.statistics.unwrap_or_default();
    Video {
        id: VideoId::new(resource.id),
        thumbnail_url: snippet.thumbnails.best_medium().map(str::to_string),
        title: snippet.title,
        description: snippet.description,
        channel_id: snippet.channel_id,
        channel_title: snippet.channel_title,
        channel_avatar: None,
        published_at: snippet.published_at,
        category_id: snippet.category_id,
        duration: resource.content_details.and_then(|c| c.duration),
        view_count: parse_count(stats.view_count.as_deref()),
        like_count: parse_count(stats.like_count.as_deref()),
        comment_count: parse_count(stats.comment_count.as_deref()),
    }
}

pub fn videos_from_details(details: VideoListResponse) -> Vec<Video> {
    details.items.into_iter().map(video_from_resource).collect()
}

pub fn channel_from_resource(resource: ChannelResource) -> Channel {
    let snippet = resource.snippet.unwrap_or_default();
    Channel {
        id: resource.id,
        avatar_url: snippet
            .thumbnails
            .default
            .as_ref()
            .map(|t| t.url.clone()),
        title: snippet.title,
        subscriber_count: resource
            .statistics
            .and_then(|s| parse_count(s.subscriber_count.as_deref())),
    }
}

/// Top-level comments of each thread, in API order
pub fn remote_comments(threads: CommentThreadListResponse) -> Vec<RemoteComment> {
    threads
        .items
        .into_iter()
        .map(|thread| {
            let comment = thread.snippet.top_level_comment;
            RemoteComment {
                id: CommentId::new(comment.id),
                snippet: comment.snippet,
            }
        })
        .collect()
}
