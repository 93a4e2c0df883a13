//! Reparenting of posts from losers onto the survivor

use crate::models::Blog;

use super::{MergePlan, ReplicaSet, Reparent};

/// Posts staged for a move by one call to [`migrate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Migration {
    pub posts_moved: usize,
    pub local_only_moved: usize,
}

/// Stage a move onto `survivor` for every post owned by every loser.
///
/// Synced posts move too: anything left on a loser would be lost when the
/// loser is deleted. Posts are never merged with each other, even when two
/// carry the same remote id.
pub fn migrate(
    losers: &[&Blog],
    survivor: &Blog,
    set: &ReplicaSet,
    plan: &mut MergePlan,
) -> Migration {
    let mut migration = Migration::default();

    for loser in losers {
        for post in set.posts_of(&loser.id) {
            plan.reparents.push(Reparent {
                post: post.id,
                from: loser.id,
                to: survivor.id,
            });
            migration.posts_moved += 1;
            if post.is_local_only() {
                migration.local_only_moved += 1;
            }
        }
    }

    migration
}
