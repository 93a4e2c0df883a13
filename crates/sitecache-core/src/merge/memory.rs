//! In-memory object store

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::models::{Account, AccountId, Blog, Post};

use super::{CommitReport, MergePlan, ObjectStore, ReplicaSet};

/// Object store that keeps each account's replica set in memory.
///
/// Commits apply to a copy that replaces the stored set only on success.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sets: BTreeMap<AccountId, ReplicaSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&mut self, account: &Account) {
        self.sets
            .entry(account.id)
            .or_insert_with(|| ReplicaSet::new(account.id));
    }

    pub fn add_blog(&mut self, blog: Blog) -> Result<()> {
        self.set_mut(&blog.account_id)?.insert_blog(blog)
    }

    pub fn add_post(&mut self, account_id: &AccountId, post: Post) -> Result<()> {
        self.set_mut(account_id)?.insert_post(post)
    }

    pub fn replicas(&self, account_id: &AccountId) -> Option<&ReplicaSet> {
        self.sets.get(account_id)
    }

    fn set_mut(&mut self, account_id: &AccountId) -> Result<&mut ReplicaSet> {
        self.sets
            .get_mut(account_id)
            .ok_or_else(|| Error::NotFound(format!("account {account_id}")))
    }
}

impl ObjectStore for MemoryStore {
    fn owners(&self) -> Result<Vec<AccountId>> {
        Ok(self.sets.keys().copied().collect())
    }

    fn fetch_replicas(&self, account_id: &AccountId) -> Result<ReplicaSet> {
        self.sets
            .get(account_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("account {account_id}")))
    }

    fn commit(&mut self, plan: &MergePlan) -> Result<CommitReport> {
        if plan.is_empty() {
            return Ok(CommitReport::default());
        }

        let current = self.set_mut(&plan.account_id)?;
        let mut staged = current.clone();
        staged.apply(plan)?;
        *current = staged;

        Ok(CommitReport {
            posts_moved: plan.reparents.len(),
            blogs_deleted: plan.deletions.len(),
        })
    }
}
