use std::sync::Mutex;

use async_trait::async_trait;
use domain::VideoId;
use serde_json::{Value, json};
use youtube_client::types::{
    ChannelListResponse, CommentThreadListResponse, SearchListResponse, VideoListResponse,
};
use youtube_client::{ApiError, SearchQuery, SearchRequest, YouTubeApi};

/// Canned API that records every call it receives
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn failure() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn search_hit(id: &str, title: &str) -> Value {
    json!({
        "id": { "kind": "youtube#video", "videoId": id },
        "snippet": {
            "publishedAt": "2023-01-01T00:00:00Z",
            "channelId": "channel-1",
            "title": title,
            "description": format!("about {title}"),
            "channelTitle": "Mock Channel"
        }
    })
}

fn video_resource(id: &str) -> Option<Value> {
    match id {
        "v1" => Some(json!({
            "id": "v1",
            "snippet": {
                "publishedAt": "2023-01-01T00:00:00Z",
                "channelId": "channel-1",
                "title": "Mock Video",
                "description": "This is a mock video",
                "channelTitle": "Mock Channel",
                "categoryId": "20"
            },
            "statistics": { "viewCount": "1400000", "likeCount": "1400", "commentCount": "1" },
            "contentDetails": { "duration": "PT1M35S" }
        })),
        "v2" => Some(json!({
            "id": "v2",
            "snippet": {
                "publishedAt": "2023-01-01T00:00:00Z",
                "channelId": "broken-channel",
                "title": "No Duration",
                "description": "",
                "channelTitle": "Other Channel"
            }
        })),
        _ => None,
    }
}

#[async_trait]
impl YouTubeApi for FakeApi {
    async fn search(&self, request: &SearchRequest) -> Result<SearchListResponse, ApiError> {
        let items = match &request.query {
            SearchQuery::Keyword(q) => {
                self.record(format!("search q={q} max={}", request.max_results));
                match q.as_str() {
                    "fail" => return Err(failure()),
                    "nothing" => vec![],
                    _ => vec![search_hit("v1", "Mock Video"), search_hit("v2", "No Duration")],
                }
            }
            SearchQuery::RelatedTo(id) => {
                self.record(format!("search related={id} max={}", request.max_results));
                match id.as_str() {
                    "v1" => vec![search_hit("v3", "Related Video")],
                    _ => return Err(failure()),
                }
            }
        };
        Ok(parse(json!({ "items": items })))
    }

    async fn videos(&self, ids: &[VideoId], parts: &[&str]) -> Result<VideoListResponse, ApiError> {
        let joined = ids.iter().map(VideoId::as_str).collect::<Vec<_>>().join(",");
        self.record(format!("videos ids={joined} parts={}", parts.join(",")));
        if ids.iter().any(|id| id.as_str() == "fail") {
            return Err(failure());
        }
        let items: Vec<Value> = ids.iter().filter_map(|id| video_resource(id.as_str())).collect();
        Ok(parse(json!({ "items": items })))
    }

    async fn channels(&self, channel_id: &str) -> Result<ChannelListResponse, ApiError> {
        self.record(format!("channels {channel_id}"));
        match channel_id {
            "channel-1" => Ok(parse(json!({
                "items": [{
                    "id": "channel-1",
                    "snippet": {
                        "title": "Mock Channel",
                        "thumbnails": { "default": { "url": "https://yt3.ggpht.com/mock.jpg" } }
                    },
                    "statistics": { "subscriberCount": "25000" }
                }]
            }))),
            _ => Err(failure()),
        }
    }

    async fn comment_threads(
        &self,
        video_id: &VideoId,
        _max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError> {
        self.record(format!("comments {video_id}"));
        match video_id.as_str() {
            "v1" => Ok(parse(json!({
                "items": [{
                    "id": "thread-1",
                    "snippet": {
                        "topLevelComment": {
                            "id": "Ugx1",
                            "snippet": {
                                "authorDisplayName": "User 1",
                                "authorProfileImageUrl": "https://yt3.ggpht.com/u1.jpg",
                                "textDisplay": "Remote comment",
                                "likeCount": 3,
                                "publishedAt": "2023-01-01T00:00:00Z"
                            }
                        }
                    }
                }]
            }))),
            _ => Err(failure()),
        }
    }
}
