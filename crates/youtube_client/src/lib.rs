//! Client for the YouTube Data API v3, either called directly with an API key
//! or through the same-origin `/api/youtube` proxy.

pub mod normalize;
pub mod types;

use async_trait::async_trait;
use domain::VideoId;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use types::{
    ChannelListResponse, CommentThreadListResponse, ErrorResponse, SearchListResponse,
    VideoListResponse,
};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Path of the proxy endpoint relative to the proxy's origin
pub const PROXY_PATH: &str = "/api/youtube";

/// API resources the pages read; also the set the proxy forwards
pub const ENDPOINTS: &[&str] = &["search", "videos", "channels", "commentThreads"];

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// What a search is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    Keyword(String),
    RelatedTo(VideoId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: SearchQuery,
    pub max_results: u32,
}

impl SearchRequest {
    pub fn keyword(q: impl Into<String>, max_results: u32) -> Self {
        Self {
            query: SearchQuery::Keyword(q.into()),
            max_results,
        }
    }

    pub fn related_to(id: VideoId, max_results: u32) -> Self {
        Self {
            query: SearchQuery::RelatedTo(id),
            max_results,
        }
    }
}

/// Read access to the remote video platform
#[async_trait]
pub trait YouTubeApi: Send + Sync {
    /// `search?part=snippet&type=video`
    async fn search(&self, request: &SearchRequest) -> Result<SearchListResponse, ApiError>;

    /// `videos?part=<parts>&id=<ids>` as one batched call
    async fn videos(&self, ids: &[VideoId], parts: &[&str]) -> Result<VideoListResponse, ApiError>;

    /// `channels?part=snippet,statistics&id=<id>`
    async fn channels(&self, channel_id: &str) -> Result<ChannelListResponse, ApiError>;

    /// `commentThreads?part=snippet&order=relevance`
    async fn comment_threads(
        &self,
        video_id: &VideoId,
        max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError>;
}

/// Where requests are sent
#[derive(Debug, Clone)]
pub enum ApiEndpoint {
    /// Call the API directly, appending the key to every request
    Direct { base_url: String, api_key: String },
    /// Call a proxy that holds the key and forwards to the API
    Proxy { base_url: String },
}

pub struct YouTubeClient {
    http: reqwest::Client,
    endpoint: ApiEndpoint,
}

impl YouTubeClient {
    pub fn new(endpoint: ApiEndpoint) -> Self {
        Self::with_http(reqwest::Client::new(), endpoint)
    }

    pub fn with_http(http: reqwest::Client, endpoint: ApiEndpoint) -> Self {
        Self { http, endpoint }
    }

    fn request(&self, resource: &str, params: &[(&str, String)]) -> RequestBuilder {
        match &self.endpoint {
            ApiEndpoint::Direct { base_url, api_key } => self
                .http
                .get(format!("{}/{resource}", base_url.trim_end_matches('/')))
                .query(params)
                .query(&[("key", api_key)]),
            ApiEndpoint::Proxy { base_url } => self
                .http
                .get(format!("{}{PROXY_PATH}", base_url.trim_end_matches('/')))
                .query(&[("endpoint", resource)])
                .query(params),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!(resource, "calling YouTube API");
        let response = self.request(resource, params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            warn!(resource, status = status.as_u16(), %message, "YouTube API call failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl YouTubeApi for YouTubeClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchListResponse, ApiError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("maxResults", request.max_results.to_string()),
        ];
        match &request.query {
            SearchQuery::Keyword(q) => params.push(("q", q.clone())),
            SearchQuery::RelatedTo(id) => params.push(("relatedToVideoId", id.to_string())),
        }
        self.fetch("search", &params).await
    }

    async fn videos(&self, ids: &[VideoId], parts: &[&str]) -> Result<VideoListResponse, ApiError> {
        let ids = ids.iter().map(VideoId::as_str).collect::<Vec<_>>().join(",");
        let params = [("part", parts.join(",")), ("id", ids)];
        self.fetch("videos", &params).await
    }

    async fn channels(&self, channel_id: &str) -> Result<ChannelListResponse, ApiError> {
        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", channel_id.to_string()),
        ];
        self.fetch("channels", &params).await
    }

    async fn comment_threads(
        &self,
        video_id: &VideoId,
        max_results: u32,
    ) -> Result<CommentThreadListResponse, ApiError> {
        let params = [
            ("part", "snippet".to_string()),
            ("videoId", video_id.to_string()),
            ("maxResults", max_results.to_string()),
            ("order", "relevance".to_string()),
            ("textFormat", "plainText".to_string()),
        ];
        self.fetch("commentThreads", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Query,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn search_handler(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        if params.get("key").map(String::as_str) != Some("test-key")
            && params.get("endpoint").is_none()
        {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": { "code": 403, "message": "API key missing" } })),
            );
        }
        let q = params.get("q").cloned().unwrap_or_default();
        (
            StatusCode::OK,
            Json(json!({
                "items": [{ "id": { "videoId": "v1" }, "snippet": { "title": q } }]
            })),
        )
    }

    async fn videos_handler(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let items: Vec<_> = params
            .get("id")
            .map(|ids| ids.split(',').map(|id| json!({ "id": id })).collect())
            .unwrap_or_default();
        Json(json!({ "items": items, "part": params.get("part") }))
    }

    async fn comment_threads_handler(
        Query(params): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let format = params.get("textFormat").cloned().unwrap_or_default();
        Json(json!({
            "items": [{
                "id": "thread-1",
                "snippet": {
                    "topLevelComment": {
                        "id": "c1",
                        "snippet": {
                            "authorDisplayName": "User 1",
                            "textDisplay": format,
                            "publishedAt": "2023-01-01T00:00:00Z"
                        }
                    }
                }
            }]
        }))
    }

    async fn broken_handler() -> impl IntoResponse {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
    }

    async fn spawn_mock() -> String {
        let app = Router::new()
            .route("/youtube/v3/search", get(search_handler))
            .route("/youtube/v3/videos", get(videos_handler))
            .route("/youtube/v3/channels", get(broken_handler))
            .route("/youtube/v3/commentThreads", get(comment_threads_handler))
            .route("/api/youtube", get(search_handler));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn direct_mode_sends_key_and_query() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Direct {
            base_url: format!("{origin}/youtube/v3/"),
            api_key: "test-key".to_string(),
        });

        let result = client
            .search(&SearchRequest::keyword("rust & tokio", 25))
            .await
            .unwrap();
        let snippet = result.items[0].snippet.as_ref().unwrap();
        assert_eq!(snippet.title, "rust & tokio");
    }

    #[tokio::test]
    async fn direct_mode_batches_video_ids() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Direct {
            base_url: format!("{origin}/youtube/v3"),
            api_key: "test-key".to_string(),
        });

        let ids = [VideoId::from("a"), VideoId::from("b"), VideoId::from("c")];
        let result = client
            .videos(&ids, &["statistics", "contentDetails"])
            .await
            .unwrap();
        let returned: Vec<_> = result.items.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(returned, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn error_envelope_message_is_surfaced() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Direct {
            base_url: format!("{origin}/youtube/v3"),
            api_key: "wrong".to_string(),
        });

        let err = client
            .search(&SearchRequest::keyword("x", 1))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_falls_back_to_reason() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Direct {
            base_url: format!("{origin}/youtube/v3"),
            api_key: "test-key".to_string(),
        });

        let err = client.channels("channel-1").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Status { status: 500, ref message } if message == "Internal Server Error"
        ));
    }

    #[tokio::test]
    async fn proxy_mode_names_endpoint_without_key() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Proxy { base_url: origin });

        let result = client
            .search(&SearchRequest::keyword("proxied", 5))
            .await
            .unwrap();
        assert_eq!(result.items[0].snippet.as_ref().unwrap().title, "proxied");
    }

    #[tokio::test]
    async fn comment_threads_request_plain_text() {
        let origin = spawn_mock().await;
        let client = YouTubeClient::new(ApiEndpoint::Direct {
            base_url: format!("{origin}/youtube/v3"),
            api_key: "test-key".to_string(),
        });

        let threads = client
            .comment_threads(&VideoId::from("v1"), 20)
            .await
            .unwrap();
        let snippet = &threads.items[0].snippet.top_level_comment.snippet;
        assert_eq!(snippet.text_display, "plainText");
    }
}
