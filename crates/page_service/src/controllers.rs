//! Fetch-and-normalize logic behind each page. No rendering, no storage.

use domain::{Channel, RemoteComment, Video, VideoId};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use youtube_client::normalize::{
    channel_from_resource, join_search_with_details, remote_comments, search_video_ids,
    video_from_resource, videos_from_details, videos_from_search,
};
use youtube_client::{ApiError, SearchRequest, YouTubeApi};

pub const HOME_MAX_RESULTS: u32 = 24;
pub const SEARCH_MAX_RESULTS: u32 = 25;
pub const COMMENTS_MAX_RESULTS: u32 = 20;
pub const RECOMMENDATIONS_MAX_RESULTS: u32 = 15;

/// Keywords the home feed falls back to when no category is selected
pub const POPULAR_QUERIES: &[&str] = &[
    "Software Engineering",
    "Productivity Hacks",
    "ReactJS Tutorials",
    "JavaScript Crash Course",
    "DIY Home Projects",
    "Space Documentaries",
    "Healthy Cooking Recipes",
    "Workout Motivation 2024",
    "Latest Financial News",
    "Stand Up Comedy Specials",
    "Unreal Engine 5 Showcases",
    "AI and Machine Learning",
    "Formula 1 Highlights",
    "Travel Vlogs Bali",
];

/// Search keyword for the home feed: the category itself, or a random
/// popular keyword for `all` / no category.
pub fn home_keyword<R: Rng + ?Sized>(category: Option<&str>, rng: &mut R) -> String {
    match category.map(str::trim).filter(|c| !c.is_empty() && *c != "all") {
        Some(category) => category.to_string(),
        None => POPULAR_QUERIES
            .choose(rng)
            .copied()
            .unwrap_or(POPULAR_QUERIES[0])
            .to_string(),
    }
}

/// Search for `keyword`, then fetch full details for every hit in one call.
/// Videos without a duration are dropped.
pub async fn load_home(api: &dyn YouTubeApi, keyword: &str) -> Result<Vec<Video>, ApiError> {
    let search = api
        .search(&SearchRequest::keyword(keyword, HOME_MAX_RESULTS))
        .await?;
    let ids = search_video_ids(&search);
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let details = api
        .videos(&ids, &["snippet", "contentDetails", "statistics"])
        .await?;
    let videos: Vec<Video> = videos_from_details(details)
        .into_iter()
        .filter(|v| v.duration.as_deref().is_some_and(|d| !d.is_empty()))
        .collect();
    debug!(keyword, hits = ids.len(), shown = videos.len(), "loaded home feed");
    Ok(videos)
}

#[derive(Debug)]
pub enum SearchOutcome {
    NoResults,
    Results(Vec<Video>),
}

/// Search, then join statistics and content details onto the hits
pub async fn load_search(api: &dyn YouTubeApi, query: &str) -> Result<SearchOutcome, ApiError> {
    let search = api
        .search(&SearchRequest::keyword(query, SEARCH_MAX_RESULTS))
        .await?;
    let ids = search_video_ids(&search);
    if ids.is_empty() {
        return Ok(SearchOutcome::NoResults);
    }

    let details = api.videos(&ids, &["statistics", "contentDetails"]).await?;
    Ok(SearchOutcome::Results(join_search_with_details(search, details)))
}

#[derive(Debug)]
pub struct WatchData {
    pub video: Video,
    pub channel: Option<Channel>,
    pub comments: Vec<RemoteComment>,
}

#[derive(Debug)]
pub enum WatchOutcome {
    NotFound,
    Found(WatchData),
}

async fn fetch_video(api: &dyn YouTubeApi, id: &VideoId) -> Result<Option<Video>, ApiError> {
    let details = api
        .videos(std::slice::from_ref(id), &["snippet", "statistics"])
        .await?;
    Ok(details.items.into_iter().next().map(video_from_resource))
}

/// Comment failures degrade to an empty list
async fn fetch_comments(api: &dyn YouTubeApi, id: &VideoId) -> Vec<RemoteComment> {
    match api.comment_threads(id, COMMENTS_MAX_RESULTS).await {
        Ok(threads) => remote_comments(threads),
        Err(e) => {
            warn!(video_id = %id, error = %e, "could not fetch comments");
            Vec::new()
        }
    }
}

/// Channel failures degrade to the channel title carried by the video
async fn fetch_channel(api: &dyn YouTubeApi, channel_id: &str) -> Option<Channel> {
    if channel_id.is_empty() {
        return None;
    }
    match api.channels(channel_id).await {
        Ok(channels) => channels.items.into_iter().next().map(channel_from_resource),
        Err(e) => {
            warn!(channel_id, error = %e, "could not fetch channel details");
            None
        }
    }
}

/// Video details and comments are fetched concurrently; channel details
/// follow once the video names its channel. Recommendations are not part of
/// this load.
pub async fn load_watch(api: &dyn YouTubeApi, id: &VideoId) -> Result<WatchOutcome, ApiError> {
    let (video, comments) = tokio::join!(fetch_video(api, id), fetch_comments(api, id));
    let Some(video) = video? else {
        return Ok(WatchOutcome::NotFound);
    };
    let channel = fetch_channel(api, &video.channel_id).await;

    Ok(WatchOutcome::Found(WatchData {
        video,
        channel,
        comments,
    }))
}

pub async fn load_recommendations(
    api: &dyn YouTubeApi,
    id: &VideoId,
) -> Result<Vec<Video>, ApiError> {
    let related = api
        .search(&SearchRequest::related_to(id.clone(), RECOMMENDATIONS_MAX_RESULTS))
        .await?;
    Ok(videos_from_search(related))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn category_is_used_as_keyword() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(home_keyword(Some("gaming"), &mut rng), "gaming");
    }

    #[test]
    fn all_or_missing_category_picks_popular_keyword() {
        let mut rng = StdRng::seed_from_u64(7);
        for category in [None, Some("all"), Some("  ")] {
            let keyword = home_keyword(category, &mut rng);
            assert!(POPULAR_QUERIES.contains(&keyword.as_str()), "{keyword}");
        }
    }

    #[tokio::test]
    async fn home_drops_videos_without_duration() {
        let api = FakeApi::default();
        let videos = load_home(&api, "gaming").await.unwrap();

        let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1"]);
        assert_eq!(
            api.calls(),
            [
                "search q=gaming max=24",
                "videos ids=v1,v2 parts=snippet,contentDetails,statistics"
            ]
        );
    }

    #[tokio::test]
    async fn empty_search_skips_detail_fetch() {
        let api = FakeApi::default();
        let outcome = load_search(&api, "nothing").await.unwrap();

        assert!(matches!(outcome, SearchOutcome::NoResults));
        assert_eq!(api.calls(), ["search q=nothing max=25"]);
    }

    #[tokio::test]
    async fn search_joins_details_by_id() {
        let api = FakeApi::default();
        let SearchOutcome::Results(videos) = load_search(&api, "rust").await.unwrap() else {
            panic!("expected results");
        };

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].view_count, Some(1_400_000));
        assert_eq!(videos[0].duration.as_deref(), Some("PT1M35S"));
        assert_eq!(videos[1].view_count, None);
        assert_eq!(api.calls()[1], "videos ids=v1,v2 parts=statistics,contentDetails");
    }

    #[tokio::test]
    async fn search_failure_is_an_error() {
        let api = FakeApi::default();
        assert!(load_search(&api, "fail").await.is_err());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn watch_loads_video_channel_and_comments() {
        let api = FakeApi::default();
        let WatchOutcome::Found(data) = load_watch(&api, &VideoId::from("v1")).await.unwrap() else {
            panic!("expected video");
        };

        assert_eq!(data.video.title, "Mock Video");
        assert_eq!(data.channel.unwrap().subscriber_count, Some(25_000));
        assert_eq!(data.comments.len(), 1);
        assert!(!api.calls().iter().any(|c| c.starts_with("search")));
    }

    #[tokio::test]
    async fn watch_tolerates_comment_and_channel_failures() {
        let api = FakeApi::default();
        let WatchOutcome::Found(data) = load_watch(&api, &VideoId::from("v2")).await.unwrap() else {
            panic!("expected video");
        };

        assert!(data.comments.is_empty());
        assert!(data.channel.is_none());
    }

    #[tokio::test]
    async fn watch_reports_missing_video() {
        let api = FakeApi::default();
        let outcome = load_watch(&api, &VideoId::from("missing")).await.unwrap();
        assert!(matches!(outcome, WatchOutcome::NotFound));
    }

    #[tokio::test]
    async fn recommendations_come_from_related_search() {
        let api = FakeApi::default();
        let videos = load_recommendations(&api, &VideoId::from("v1")).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(api.calls(), ["search related=v1 max=15"]);
    }
}
