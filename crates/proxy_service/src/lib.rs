use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use youtube_client::{ENDPOINTS, PROXY_PATH};

/// Upstream the proxy forwards to, and the key it appends
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub base_url: String,
    pub api_key: String,
}

struct ProxyState {
    http: reqwest::Client,
    config: ProxyConfig,
}

/// Error envelope in the same shape the API uses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code: status.as_u16(),
            message,
        },
    };
    (status, Json(body)).into_response()
}

/// Forward `endpoint` plus the remaining query parameters to the API and
/// relay its status code and body verbatim.
async fn youtube_proxy(
    State(proxy): State<Arc<ProxyState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let endpoint = params
        .iter()
        .find(|(name, _)| name == "endpoint")
        .map(|(_, value)| value.clone())
        .unwrap_or_default();

    if !ENDPOINTS.contains(&endpoint.as_str()) {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Unsupported endpoint '{endpoint}'. Use one of: {}", ENDPOINTS.join(", ")),
        );
    }

    // The key is always the server's own
    let forwarded: Vec<(String, String)> = params
        .into_iter()
        .filter(|(name, _)| name != "endpoint" && name != "key")
        .collect();

    let url = format!("{}/{endpoint}", proxy.config.base_url.trim_end_matches('/'));
    debug!(%endpoint, params = forwarded.len(), "forwarding to YouTube API");

    let upstream = proxy
        .http
        .get(&url)
        .query(&forwarded)
        .query(&[("key", proxy.config.api_key.as_str())])
        .send()
        .await;

    let upstream = match upstream {
        Ok(response) => response,
        Err(e) => {
            warn!(%endpoint, error = %e, "upstream request failed");
            return error_response(StatusCode::BAD_GATEWAY, "Upstream request failed".to_string());
        }
    };

    let status = upstream.status();
    match upstream.bytes().await {
        Ok(body) => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            warn!(%endpoint, error = %e, "failed to read upstream body");
            error_response(StatusCode::BAD_GATEWAY, "Upstream response was truncated".to_string())
        }
    }
}

// Create the router for the proxy endpoint
pub fn create_router(config: ProxyConfig) -> Router {
    let state = Arc::new(ProxyState {
        http: reqwest::Client::new(),
        config,
    });
    Router::new()
        .route(PROXY_PATH, get(youtube_proxy))
        .with_state(state)
}
