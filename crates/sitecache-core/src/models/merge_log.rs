//! Merge audit log model

use serde::{Deserialize, Serialize};

use super::{AccountId, BlogId};

/// One loser folded into a survivor by a committed merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeLogEntry {
    /// Log row identifier
    pub id: i64,
    /// Account whose blogs were merged
    pub account_id: AccountId,
    /// Blog that was kept
    pub survivor_id: BlogId,
    /// Blog that was deleted
    pub loser_id: BlogId,
    /// Number of posts moved from the loser to the survivor
    pub posts_moved: usize,
    /// Commit timestamp (Unix ms)
    pub merged_at: i64,
}
