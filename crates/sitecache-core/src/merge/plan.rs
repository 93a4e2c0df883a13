//! Staged merge operations and their reports

use serde::Serialize;

use crate::models::{AccountId, BlogId, EquivalenceKey, PostId};

/// Move one post from a loser to the survivor of its class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reparent {
    pub post: PostId,
    pub from: BlogId,
    pub to: BlogId,
}

/// Outcome of merging one equivalence class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMerge {
    pub key: EquivalenceKey,
    pub survivor: BlogId,
    pub losers: Vec<BlogId>,
    /// Posts reparented onto the survivor
    pub posts_moved: usize,
    /// Subset of `posts_moved` that only exists locally
    pub local_only_moved: usize,
}

/// Every mutation needed to deduplicate one account, staged as a value.
///
/// Nothing touches storage until the plan is handed to
/// [`ObjectStore::commit`](super::ObjectStore::commit). Dropping the plan
/// discards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    pub account_id: AccountId,
    pub reparents: Vec<Reparent>,
    pub deletions: Vec<BlogId>,
    pub classes: Vec<ClassMerge>,
}

impl MergePlan {
    pub const fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            reparents: Vec::new(),
            deletions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// True when the account had no duplicates
    pub fn is_empty(&self) -> bool {
        self.reparents.is_empty() && self.deletions.is_empty()
    }

    /// Number of row writes a commit will perform
    pub fn mutation_count(&self) -> usize {
        self.reparents.len() + self.deletions.len()
    }
}

/// What a store wrote when committing a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub posts_moved: usize,
    pub blogs_deleted: usize,
}

/// Summary of one deduplication run for an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub account_id: AccountId,
    pub classes: Vec<ClassMerge>,
    pub blogs_deleted: usize,
    pub posts_moved: usize,
    /// False for dry runs
    pub committed: bool,
}

impl MergeReport {
    pub fn from_plan(plan: MergePlan, committed: bool) -> Self {
        Self {
            account_id: plan.account_id,
            blogs_deleted: plan.deletions.len(),
            posts_moved: plan.reparents.len(),
            classes: plan.classes,
            committed,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Reports for every account swept by [`Deduplicator::run_all`](super::Deduplicator::run_all)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub reports: Vec<MergeReport>,
    /// Accounts whose merge failed, with the error message
    pub failures: Vec<(AccountId, String)>,
}
