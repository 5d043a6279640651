use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a video on the remote platform
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Identifier of a comment, either assigned by the remote platform or generated locally
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Represents a video resource, normalized from one or more API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub channel_avatar: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: Option<String>,
    /// ISO 8601 duration as reported by the API, e.g. `PT4M13S`
    pub duration: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

/// Represents a channel resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub avatar_url: Option<String>,
    pub subscriber_count: Option<u64>,
}

/// Display fields shared by remote and local comments.
///
/// Field names follow the API's `commentThreads` snippet so that persisted
/// local comments keep the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    pub author_display_name: String,
    #[serde(default)]
    pub author_profile_image_url: String,
    pub published_at: DateTime<Utc>,
    pub text_display: String,
    #[serde(default)]
    pub like_count: u64,
}

/// A comment fetched from the remote platform. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteComment {
    pub id: CommentId,
    pub snippet: CommentSnippet,
}

/// A comment authored in this application and kept in the annotation store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalComment {
    pub id: CommentId,
    pub snippet: CommentSnippet,
}

/// A comment of either provenance. The variant is fixed when the value is
/// built and is never derived from the shape of the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comment {
    Remote(RemoteComment),
    Local(LocalComment),
}

impl Comment {
    pub fn id(&self) -> &CommentId {
        match self {
            Comment::Remote(c) => &c.id,
            Comment::Local(c) => &c.id,
        }
    }

    pub fn snippet(&self) -> &CommentSnippet {
        match self {
            Comment::Remote(c) => &c.snippet,
            Comment::Local(c) => &c.snippet,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Comment::Local(_))
    }
}

/// A comment paired with the viewer's like flag, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub comment: Comment,
    pub liked: bool,
}

impl CommentView {
    /// Count shown next to the like button: the reported count plus one when
    /// the viewer has liked the comment.
    pub fn like_count(&self) -> u64 {
        self.comment.snippet().like_count + u64::from(self.liked)
    }
}
