use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use domain::{
    Comment, CommentId, CommentSnippet, CommentView, LocalComment, RemoteComment, VideoId,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{KeyValueStore, StoreError};

/// Storage key of the comments-by-video blob
pub const COMMENTS_KEY: &str = "yt-clone-comments";
/// Storage key of the likes-by-video blob
pub const LIKES_KEY: &str = "yt-clone-likes";

pub const LOCAL_ID_PREFIX: &str = "local-";
pub const GUEST_DISPLAY_NAME: &str = "Guest User";
pub const GUEST_AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?w=40&h=40&fit=crop&crop=face";

type CommentsByVideo = BTreeMap<VideoId, Vec<LocalComment>>;
type LikesByVideo = BTreeMap<VideoId, BTreeMap<CommentId, bool>>;

/// Result of a mutation that was applied in memory.
///
/// `warning` is set when the write-through to the backend failed; the
/// in-memory state still reflects the mutation.
#[derive(Debug)]
pub struct Persisted<T> {
    pub value: T,
    pub warning: Option<StoreError>,
}

impl<T> Persisted<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// Per-video overlay of guest comments and like toggles on top of read-only
/// remote data.
pub struct AnnotationStore {
    backend: Arc<dyn KeyValueStore>,
    comments: CommentsByVideo,
    likes: LikesByVideo,
    last_local_millis: i64,
}

impl AnnotationStore {
    /// Read both mappings from the backend. Missing or unreadable blobs load
    /// as empty mappings.
    pub fn load(backend: Arc<dyn KeyValueStore>) -> Self {
        let comments: CommentsByVideo = read_blob(backend.as_ref(), COMMENTS_KEY);
        let likes: LikesByVideo = read_blob(backend.as_ref(), LIKES_KEY);

        let last_local_millis = comments
            .values()
            .flatten()
            .filter_map(|c| c.id.as_str().strip_prefix(LOCAL_ID_PREFIX))
            .filter_map(|millis| millis.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        debug!(
            videos_with_comments = comments.len(),
            videos_with_likes = likes.len(),
            "loaded annotations"
        );

        Self {
            backend,
            comments,
            likes,
            last_local_millis,
        }
    }

    /// Append a guest comment for `video_id` and persist the comments blob.
    ///
    /// Empty or whitespace-only text is ignored and yields `None`.
    pub fn add_comment(
        &mut self,
        video_id: &VideoId,
        text: &str,
    ) -> Persisted<Option<LocalComment>> {
        self.add_comment_at(video_id, text, Utc::now())
    }

    pub fn add_comment_at(
        &mut self,
        video_id: &VideoId,
        text: &str,
        now: DateTime<Utc>,
    ) -> Persisted<Option<LocalComment>> {
        let text = text.trim();
        if text.is_empty() {
            return Persisted::clean(None);
        }

        let comment = LocalComment {
            id: self.next_local_id(now),
            snippet: CommentSnippet {
                author_display_name: GUEST_DISPLAY_NAME.to_string(),
                author_profile_image_url: GUEST_AVATAR_URL.to_string(),
                published_at: now,
                text_display: text.to_string(),
                like_count: 0,
            },
        };

        self.comments
            .entry(video_id.clone())
            .or_default()
            .push(comment.clone());
        debug!(video_id = %video_id, comment_id = %comment.id, "added local comment");

        Persisted {
            value: Some(comment),
            warning: self.flush(COMMENTS_KEY, &self.comments),
        }
    }

    /// Flip the like flag for a comment and persist the likes blob.
    /// Returns the new flag.
    pub fn toggle_like(&mut self, video_id: &VideoId, comment_id: &CommentId) -> Persisted<bool> {
        let flag = self
            .likes
            .entry(video_id.clone())
            .or_default()
            .entry(comment_id.clone())
            .or_insert(false);
        *flag = !*flag;
        let liked = *flag;
        debug!(video_id = %video_id, comment_id = %comment_id, liked, "toggled like");

        Persisted {
            value: liked,
            warning: self.flush(LIKES_KEY, &self.likes),
        }
    }

    pub fn is_liked(&self, video_id: &VideoId, comment_id: &CommentId) -> bool {
        self.likes
            .get(video_id)
            .and_then(|flags| flags.get(comment_id))
            .copied()
            .unwrap_or(false)
    }

    /// Local comments for a video in insertion (chronological) order
    pub fn local_comments(&self, video_id: &VideoId) -> &[LocalComment] {
        self.comments
            .get(video_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn comment_count(&self, video_id: &VideoId) -> usize {
        self.local_comments(video_id).len()
    }

    /// Display order for a video: local comments newest first, then remote
    /// comments in the order the API returned them.
    pub fn merge_comments(
        &self,
        video_id: &VideoId,
        remote: Vec<RemoteComment>,
    ) -> Vec<CommentView> {
        let local = self
            .local_comments(video_id)
            .iter()
            .rev()
            .cloned()
            .map(Comment::Local);
        let remote = remote.into_iter().map(Comment::Remote);

        local
            .chain(remote)
            .map(|comment| CommentView {
                liked: self.is_liked(video_id, comment.id()),
                comment,
            })
            .collect()
    }

    /// Rewrite both blobs to the backend
    pub fn save(&self) -> Result<(), StoreError> {
        write_blob(self.backend.as_ref(), COMMENTS_KEY, &self.comments)?;
        write_blob(self.backend.as_ref(), LIKES_KEY, &self.likes)
    }

    fn flush<T: Serialize>(&self, key: &str, value: &T) -> Option<StoreError> {
        write_blob(self.backend.as_ref(), key, value)
            .map_err(|e| {
                warn!(key, error = %e, "failed to persist annotations; keeping in-memory copy");
                e
            })
            .err()
    }

    fn next_local_id(&mut self, now: DateTime<Utc>) -> CommentId {
        let millis = now.timestamp_millis().max(self.last_local_millis + 1);
        self.last_local_millis = millis;
        CommentId::new(format!("{LOCAL_ID_PREFIX}{millis}"))
    }
}

fn read_blob<T: DeserializeOwned + Default>(backend: &dyn KeyValueStore, key: &str) -> T {
    match backend.get(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(key, error = %e, "stored annotations are malformed; starting empty");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read annotations; starting empty");
            T::default()
        }
    }
}

fn write_blob<T: Serialize>(
    backend: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    backend.set(key, &raw)
}
