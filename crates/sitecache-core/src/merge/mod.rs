//! Replica merge engine.
//!
//! Racing "create if missing" syncs can leave an account with several cached
//! copies of the same remote site. This module finds those copies, keeps the
//! one holding the most unsynced work, moves every post of the others onto
//! it and deletes them. All of that is staged as a [`MergePlan`] and written
//! by a single [`ObjectStore::commit`], so storage sees either the whole
//! merge or none of it.

mod classify;
mod coordinator;
mod graph;
mod memory;
mod migrate;
mod plan;
mod survivor;

pub use classify::{classify, EquivalenceClass};
pub use coordinator::{plan_merge, Deduplicator};
pub use graph::ReplicaSet;
pub use memory::MemoryStore;
pub use migrate::{migrate, Migration};
pub use plan::{ClassMerge, CommitReport, MergePlan, MergeReport, Reparent, SweepReport};
pub use survivor::{select_survivor, Selection};

use crate::error::Result;
use crate::models::AccountId;

/// Persistence the merge engine reads from and commits to
pub trait ObjectStore {
    /// Accounts known to the store
    fn owners(&self) -> Result<Vec<AccountId>>;

    /// Load every blog of an account with the posts each one owns
    fn fetch_replicas(&self, account_id: &AccountId) -> Result<ReplicaSet>;

    /// Persist a plan atomically.
    ///
    /// On error nothing from the plan is visible in the store.
    fn commit(&mut self, plan: &MergePlan) -> Result<CommitReport>;
}
