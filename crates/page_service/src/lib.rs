use axum::{
    Form, Router,
    extract::{Query, State},
    http::header::CONTENT_TYPE,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use chrono::Utc;
use datastore::AnnotationStore;
use domain::{CommentId, VideoId};
use render::cards::{
    comment_anchor, recommendation_card, search_result_card, video_card, watch_href,
};
use render::pages::{WatchPage, home_page, search_page, watch_page};
use render::message;
use serde::Deserialize;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};
use youtube_client::YouTubeApi;

pub mod controllers;
pub mod error;
#[cfg(test)]
mod testing;

use controllers::{SearchOutcome, WatchOutcome};
use error::PageError;

const STYLESHEET: &str = include_str!("../assets/style.css");

const UNSAVED_NOTICE: &str =
    "Your change could not be saved and will be lost when the server restarts.";

/// Shared state for page handlers
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn YouTubeApi>,
    pub store: Arc<RwLock<AnnotationStore>>,
}

impl AppState {
    pub fn new(api: Arc<dyn YouTubeApi>, store: AnnotationStore) -> Self {
        Self {
            api,
            store: Arc::new(RwLock::new(store)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WatchParams {
    #[serde(default)]
    pub v: Option<String>,
    #[serde(default)]
    pub unsaved: bool,
}

/// Form body for posting a comment
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub v: String,
    #[serde(default)]
    pub text: String,
}

/// Form body for toggling a like
#[derive(Debug, Deserialize)]
pub struct LikeForm {
    pub v: String,
    pub comment_id: String,
}

fn video_id_param(v: Option<String>) -> Option<VideoId> {
    v.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(VideoId::new)
}

async fn home_handler(
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> Html<String> {
    let active = params
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "all".to_string());
    let keyword = controllers::home_keyword(Some(active.as_str()), &mut rand::thread_rng());

    let grid = match controllers::load_home(state.api.as_ref(), &keyword).await {
        Ok(videos) if videos.is_empty() => message(
            "error-text",
            "No videos found. The API might be unavailable or the category is empty.",
        ),
        Ok(videos) => {
            let now = Utc::now();
            videos.iter().map(|v| video_card(v, now)).collect()
        }
        Err(e) => {
            warn!(%keyword, error = %e, "error fetching videos");
            message("error-text", &format!("Failed to load videos. {e}"))
        }
    };

    Html(home_page(&active, &grid))
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let Some(query) = query else {
        return Html(search_page(None, ""));
    };

    let results = match controllers::load_search(state.api.as_ref(), query).await {
        Ok(SearchOutcome::NoResults) => "<p>No results found.</p>".to_string(),
        Ok(SearchOutcome::Results(videos)) => {
            let now = Utc::now();
            videos.iter().map(|v| search_result_card(v, now)).collect()
        }
        Err(e) => {
            warn!(query, error = %e, "error fetching search results");
            message("error-text", "Failed to load search results.")
        }
    };

    Html(search_page(Some(query), &results))
}

async fn watch_handler(
    State(state): State<AppState>,
    Query(params): Query<WatchParams>,
) -> Result<Html<String>, PageError> {
    let id = video_id_param(params.v).ok_or(PageError::MissingVideoId)?;

    let data = match controllers::load_watch(state.api.as_ref(), &id).await? {
        WatchOutcome::Found(data) => data,
        WatchOutcome::NotFound => return Err(PageError::VideoNotFound(id)),
    };

    let comments = state
        .store
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .merge_comments(&id, data.comments);

    let page = WatchPage {
        video: &data.video,
        channel: data.channel.as_ref(),
        comments: &comments,
        notice: params.unsaved.then_some(UNSAVED_NOTICE),
    };
    Ok(Html(watch_page(&page, Utc::now())))
}

/// HTML fragment the watch page loads after it is displayed
async fn recommendations_handler(
    State(state): State<AppState>,
    Query(params): Query<WatchParams>,
) -> Html<String> {
    let empty = || Html("<p>No recommendations found.</p>".to_string());
    let Some(id) = video_id_param(params.v) else {
        return empty();
    };

    match controllers::load_recommendations(state.api.as_ref(), &id).await {
        Ok(videos) if !videos.is_empty() => {
            let now = Utc::now();
            Html(videos.iter().map(|v| recommendation_card(v, now)).collect())
        }
        Ok(_) => empty(),
        Err(e) => {
            warn!(video_id = %id, error = %e, "could not fetch recommendations");
            empty()
        }
    }
}

fn back_to_watch(id: &VideoId, saved: bool, anchor: Option<&CommentId>) -> Redirect {
    let mut location = watch_href(id);
    if !saved {
        location.push_str("&unsaved=true");
    }
    if let Some(comment) = anchor {
        location.push('#');
        location.push_str(&comment_anchor(comment));
    }
    Redirect::to(&location)
}

async fn create_comment(
    State(state): State<AppState>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, PageError> {
    let id = video_id_param(Some(form.v)).ok_or(PageError::MissingVideoId)?;
    let outcome = state
        .store
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .add_comment(&id, &form.text);

    if let Some(comment) = &outcome.value {
        info!(video_id = %id, comment_id = %comment.id, "comment added");
    }
    Ok(back_to_watch(&id, outcome.warning.is_none(), None))
}

async fn toggle_like(
    State(state): State<AppState>,
    Form(form): Form<LikeForm>,
) -> Result<Redirect, PageError> {
    let id = video_id_param(Some(form.v)).ok_or(PageError::MissingVideoId)?;
    let comment = CommentId::new(form.comment_id);
    let outcome = state
        .store
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .toggle_like(&id, &comment);

    info!(video_id = %id, comment_id = %comment, liked = outcome.value, "like toggled");
    Ok(back_to_watch(&id, outcome.warning.is_none(), Some(&comment)))
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css")], STYLESHEET)
}

// Create the router for the pages and their form posts
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/search", get(search_handler))
        .route("/watch", get(watch_handler))
        .route("/watch/recommendations", get(recommendations_handler))
        .route("/watch/comments", post(create_comment))
        .route("/watch/likes", post(toggle_like))
        .route("/static/style.css", get(stylesheet))
        .with_state(state)
}
