use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use domain::VideoId;
use thiserror::Error;
use youtube_client::ApiError;

/// Failures that replace the whole watch page with an error heading
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Video ID not found in URL.")]
    MissingVideoId,

    #[error("Video with ID \"{0}\" not found.")]
    VideoNotFound(VideoId),

    #[error("Failed to fetch video details")]
    Api(#[from] ApiError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match self {
            PageError::MissingVideoId => StatusCode::BAD_REQUEST,
            PageError::VideoNotFound { .. } => StatusCode::NOT_FOUND,
            PageError::Api { .. } => StatusCode::BAD_GATEWAY,
        };

        (status, Html(render::pages::error_page(&self.to_string()))).into_response()
    }
}
