//! Post model - content cached under a blog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{BlogId, RemoteId};

/// A unique identifier for a cached post, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    /// Create a new unique post ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Pending,
    Private,
    Publish,
    Scheduled,
    Trash,
}

impl PostStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Private => "private",
            Self::Publish => "publish",
            Self::Scheduled => "scheduled",
            Self::Trash => "trash",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "private" => Ok(Self::Private),
            "publish" | "published" => Ok(Self::Publish),
            "scheduled" | "future" => Ok(Self::Scheduled),
            "trash" => Ok(Self::Trash),
            other => Err(format!("unknown post status '{other}'")),
        }
    }
}

/// A post cached under exactly one blog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Local identifier
    pub id: PostId,
    /// Blog currently owning this post
    pub blog_id: BlogId,
    /// Id assigned by the remote service; `None` until first upload
    pub remote_id: Option<RemoteId>,
    /// Post title
    pub title: String,
    /// Publication status
    pub status: PostStatus,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Post {
    /// Create a new local-only draft under the given blog
    #[must_use]
    pub fn new(blog_id: BlogId, title: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: PostId::new(),
            blog_id,
            remote_id: None,
            title: title.into(),
            status: PostStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn with_remote_id(mut self, remote_id: RemoteId) -> Self {
        self.remote_id = Some(remote_id);
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    /// True when the post has never been uploaded and exists only here
    #[must_use]
    pub const fn is_local_only(&self) -> bool {
        self.remote_id.is_none()
    }
}
