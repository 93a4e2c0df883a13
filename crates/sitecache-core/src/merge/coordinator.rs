//! Orchestration of a whole-account merge

use crate::error::Result;
use crate::models::AccountId;

use super::classify::classify;
use super::migrate::migrate;
use super::survivor::select_survivor;
use super::{ClassMerge, MergePlan, MergeReport, ObjectStore, ReplicaSet, SweepReport};

/// Compute the merge plan for a loaded replica set.
///
/// Pure: reads `set` and returns every reparent and deletion needed for all
/// duplicate classes. Singleton classes contribute nothing, so an account
/// without duplicates yields an empty plan.
pub fn plan_merge(set: &ReplicaSet) -> MergePlan {
    let mut plan = MergePlan::new(set.account_id());

    for class in classify(set.blogs()) {
        let Some(selection) = select_survivor(&class.members, set) else {
            continue;
        };

        let migration = migrate(&selection.losers, selection.survivor, set, &mut plan);
        let losers: Vec<_> = selection.losers.iter().map(|blog| blog.id).collect();
        plan.deletions.extend(losers.iter().copied());

        tracing::debug!(
            survivor = %selection.survivor.id,
            losers = losers.len(),
            posts_moved = migration.posts_moved,
            local_only_moved = migration.local_only_moved,
            "Merging duplicate blogs of {}",
            selection.survivor.label()
        );

        plan.classes.push(ClassMerge {
            key: class.key,
            survivor: selection.survivor.id,
            losers,
            posts_moved: migration.posts_moved,
            local_only_moved: migration.local_only_moved,
        });
    }

    plan
}

/// Entry point for collapsing duplicate cached blogs.
///
/// `deduplicate` only stages; callers commit the returned plan themselves or
/// use [`run`](Self::run) to do both.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator {
    dry_run: bool,
}

impl Deduplicator {
    pub const fn new() -> Self {
        Self { dry_run: false }
    }

    /// Stage plans without ever committing them
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Stage the merge of an account's duplicate blogs
    pub fn deduplicate<S: ObjectStore>(
        &self,
        store: &S,
        account_id: &AccountId,
    ) -> Result<MergePlan> {
        let set = store.fetch_replicas(account_id)?;
        Ok(plan_merge(&set))
    }

    /// Stage the merge and return the graph as it would look afterwards
    pub fn preview<S: ObjectStore>(
        &self,
        store: &S,
        account_id: &AccountId,
    ) -> Result<(MergePlan, ReplicaSet)> {
        let mut set = store.fetch_replicas(account_id)?;
        let plan = plan_merge(&set);
        set.apply(&plan)?;
        Ok((plan, set))
    }

    /// Stage and commit the merge for one account
    pub fn run<S: ObjectStore>(
        &self,
        store: &mut S,
        account_id: &AccountId,
    ) -> Result<MergeReport> {
        let plan = self.deduplicate(store, account_id)?;
        if plan.is_empty() || self.dry_run {
            return Ok(MergeReport::from_plan(plan, false));
        }

        let commit = store.commit(&plan)?;
        tracing::info!(
            account = %account_id,
            blogs_deleted = commit.blogs_deleted,
            posts_moved = commit.posts_moved,
            "Merged duplicate blogs"
        );
        Ok(MergeReport::from_plan(plan, true))
    }

    /// Run every account through [`run`](Self::run).
    ///
    /// Each account commits on its own; a failure is logged and recorded and
    /// the sweep moves on, leaving that account for the next pass.
    pub fn run_all<S: ObjectStore>(&self, store: &mut S) -> Result<SweepReport> {
        let mut sweep = SweepReport::default();
        for account_id in store.owners()? {
            match self.run(store, &account_id) {
                Ok(report) => sweep.reports.push(report),
                Err(error) => {
                    tracing::warn!(
                        account = %account_id,
                        "Blog merge failed, will retry on next sync: {error}"
                    );
                    sweep.failures.push((account_id, error.to_string()));
                }
            }
        }
        Ok(sweep)
    }
}
