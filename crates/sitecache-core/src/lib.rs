//! sitecache-core - Core library for sitecache
//!
//! This crate contains the cached site models, the `SQLite` object store, and
//! the replica merge engine that collapses duplicate cached copies of the same
//! remote site into one while keeping every post they hold.

pub mod db;
pub mod error;
pub mod merge;
pub mod models;
pub mod util;

pub use error::{Error, Result};
pub use merge::{Deduplicator, MergePlan, MergeReport};
pub use models::{Account, AccountId, Blog, BlogId, Post, PostId, RemoteId};
