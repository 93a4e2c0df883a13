//! Data models for sitecache

mod account;
mod blog;
mod merge_log;
mod post;
mod remote;

pub use account::{Account, AccountId};
pub use blog::{Blog, BlogId, EquivalenceKey};
pub use merge_log::MergeLogEntry;
pub use post::{Post, PostId, PostStatus};
pub use remote::RemoteId;
