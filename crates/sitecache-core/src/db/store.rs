//! `SQLite` implementation of the merge engine's object store

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::rows::{count_param, get_count, parse_blog, parse_post, BLOG_COLUMNS};
use crate::error::{Error, Result};
use crate::merge::{CommitReport, MergePlan, ObjectStore, ReplicaSet};
use crate::models::{AccountId, BlogId};
use crate::util::unix_timestamp_millis;

/// Object store backed by the local site cache database
pub struct SqliteObjectStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteObjectStore<'a> {
    /// Create a new store with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn blog_owner(&self, blog_id: &BlogId) -> Result<Option<String>> {
        let owner = self
            .conn
            .query_row(
                "SELECT account_id FROM blogs WHERE id = ?",
                params![blog_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(owner)
    }

    /// Check that every blog the plan touches exists and belongs to its account
    fn check_blogs(&self, plan: &MergePlan) -> Result<()> {
        let account = plan.account_id.as_str();
        let deleted: HashSet<BlogId> = plan.deletions.iter().copied().collect();
        let targets = plan.reparents.iter().map(|reparent| reparent.to);

        for blog_id in plan.deletions.iter().copied().chain(targets) {
            match self.blog_owner(&blog_id)? {
                Some(owner) if owner == account => {}
                Some(_) => {
                    return Err(Error::Validation(format!(
                        "blog {blog_id} does not belong to account {account}"
                    )))
                }
                None => return Err(Error::Validation(format!("blog {blog_id} no longer exists"))),
            }
        }

        if let Some(reparent) = plan
            .reparents
            .iter()
            .find(|reparent| deleted.contains(&reparent.to))
        {
            return Err(Error::Validation(format!(
                "target blog {} is being deleted",
                reparent.to
            )));
        }
        Ok(())
    }
}

impl ObjectStore for SqliteObjectStore<'_> {
    fn owners(&self) -> Result<Vec<AccountId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM accounts ORDER BY created_at ASC, id ASC")?;

        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        ids.into_iter()
            .map(|id| {
                id.parse()
                    .map_err(|_| Error::Database(format!("Invalid account ID: {id}")))
            })
            .collect()
    }

    fn fetch_replicas(&self, account_id: &AccountId) -> Result<ReplicaSet> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = ?)",
            params![account_id.as_str()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(Error::NotFound(format!("account {account_id}")));
        }

        let mut blogs_stmt = self.conn.prepare(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE account_id = ? ORDER BY created_at ASC, id ASC"
        ))?;
        let blogs = blogs_stmt
            .query_map(params![account_id.as_str()], parse_blog)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut posts_stmt = self.conn.prepare(
            "SELECT p.id, p.blog_id, p.remote_id, p.title, p.status, p.created_at, p.updated_at
             FROM posts p
             JOIN blogs b ON p.blog_id = b.id
             WHERE b.account_id = ?
             ORDER BY p.created_at ASC, p.id ASC",
        )?;
        let posts = posts_stmt
            .query_map(params![account_id.as_str()], parse_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        ReplicaSet::from_parts(*account_id, blogs, posts)
    }

    fn commit(&mut self, plan: &MergePlan) -> Result<CommitReport> {
        if plan.is_empty() {
            return Ok(CommitReport::default());
        }

        // Dropping the transaction on any early return rolls everything back.
        let tx = self.conn.unchecked_transaction()?;
        self.check_blogs(plan)?;

        for reparent in &plan.reparents {
            let changed = tx.execute(
                "UPDATE posts SET blog_id = ? WHERE id = ? AND blog_id = ?",
                params![
                    reparent.to.as_str(),
                    reparent.post.as_str(),
                    reparent.from.as_str()
                ],
            )?;
            if changed != 1 {
                tracing::warn!(post = %reparent.post, "Rejecting stale merge plan");
                return Err(Error::Validation(format!(
                    "post {} is no longer on blog {}",
                    reparent.post, reparent.from
                )));
            }
        }

        for blog_id in &plan.deletions {
            let remaining = tx.query_row(
                "SELECT COUNT(*) FROM posts WHERE blog_id = ?",
                params![blog_id.as_str()],
                |row| get_count(row, 0),
            )?;
            if remaining > 0 {
                tracing::warn!(blog = %blog_id, remaining, "Rejecting stale merge plan");
                return Err(Error::Validation(format!(
                    "blog {blog_id} would be deleted with {remaining} posts still attached"
                )));
            }
            tx.execute("DELETE FROM blogs WHERE id = ?", params![blog_id.as_str()])?;
        }

        let merged_at = unix_timestamp_millis();
        for class in &plan.classes {
            for loser in &class.losers {
                let moved = plan
                    .reparents
                    .iter()
                    .filter(|reparent| reparent.from == *loser)
                    .count();
                tx.execute(
                    "INSERT INTO merge_log (account_id, survivor_id, loser_id, posts_moved, merged_at)
                     VALUES (?, ?, ?, ?, ?)",
                    params![
                        plan.account_id.as_str(),
                        class.survivor.as_str(),
                        loser.as_str(),
                        count_param(moved),
                        merged_at
                    ],
                )?;
            }
        }

        tx.commit()?;

        Ok(CommitReport {
            posts_moved: plan.reparents.len(),
            blogs_deleted: plan.deletions.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, SiteRepository, SqliteSiteRepository};
    use crate::merge::{Deduplicator, Reparent};
    use crate::models::{Blog, Post, RemoteId};
    use pretty_assertions::assert_eq;

    fn setup() -> (Database, AccountId) {
        let db = Database::open_in_memory().unwrap();
        let account = SqliteSiteRepository::new(db.connection())
            .create_account("alice")
            .unwrap();
        (db, account.id)
    }

    fn add_blog(
        db: &Database,
        account: AccountId,
        remote_id: i64,
        posts: &[Option<i64>],
    ) -> BlogId {
        let repo = SqliteSiteRepository::new(db.connection());
        let blog = Blog::new(account).with_remote_id(RemoteId(remote_id));
        repo.insert_blog(&blog).unwrap();
        for (n, post_remote_id) in posts.iter().enumerate() {
            let mut post = Post::new(blog.id, format!("Post {n}"));
            post.remote_id = post_remote_id.map(RemoteId);
            repo.insert_post(&post).unwrap();
        }
        blog.id
    }

    fn snapshot(db: &Database, account: AccountId) -> Vec<(BlogId, usize)> {
        let repo = SqliteSiteRepository::new(db.connection());
        repo.list_blogs(&account)
            .unwrap()
            .into_iter()
            .map(|blog| (blog.id, repo.list_posts(&blog.id).unwrap().len()))
            .collect()
    }

    #[test]
    fn test_fetch_replicas_loads_children() {
        let (db, account) = setup();
        let blog = add_blog(&db, account, 1, &[None, Some(5)]);

        let set = SqliteObjectStore::new(db.connection())
            .fetch_replicas(&account)
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.post_count(&blog), 2);
        assert_eq!(set.local_only_count(&blog), 1);
    }

    #[test]
    fn test_fetch_replicas_unknown_account() {
        let (db, _) = setup();
        let result = SqliteObjectStore::new(db.connection()).fetch_replicas(&AccountId::new());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_unique_blogs_commit_nothing() {
        let (db, account) = setup();
        add_blog(&db, account, 1, &[]);
        add_blog(&db, account, 2, &[None, None]);
        add_blog(&db, account, 3, &[]);
        let before = snapshot(&db, account);

        let mut store = SqliteObjectStore::new(db.connection());
        let report = Deduplicator::new().run(&mut store, &account).unwrap();

        assert!(report.is_noop());
        assert_eq!(snapshot(&db, account), before);
        let repo = SqliteSiteRepository::new(db.connection());
        assert!(repo.list_merge_log(10).unwrap().is_empty());
    }

    #[test]
    fn test_merge_keeps_drafts_and_logs() {
        let (db, account) = setup();
        let a = add_blog(&db, account, 2, &[None, None]);
        let b = add_blog(&db, account, 2, &[]);
        let c = add_blog(&db, account, 3, &[]);
        let d = add_blog(&db, account, 3, &[None, None]);
        let e = add_blog(&db, account, 1, &[]);

        let mut store = SqliteObjectStore::new(db.connection());
        let report = Deduplicator::new().run(&mut store, &account).unwrap();
        assert!(report.committed);
        assert_eq!(report.blogs_deleted, 2);

        let mut after = snapshot(&db, account);
        after.sort();
        let mut expected = vec![(a, 2), (d, 2), (e, 0)];
        expected.sort();
        assert_eq!(after, expected);

        let repo = SqliteSiteRepository::new(db.connection());
        let mut losers: Vec<BlogId> = repo
            .list_merge_log(10)
            .unwrap()
            .into_iter()
            .map(|entry| entry.loser_id)
            .collect();
        losers.sort();
        let mut expected_losers = vec![b, c];
        expected_losers.sort();
        assert_eq!(losers, expected_losers);
    }

    #[test]
    fn test_merge_moves_synced_and_local_posts() {
        let (db, account) = setup();
        add_blog(&db, account, 2, &[None, Some(1)]);
        add_blog(&db, account, 2, &[Some(1), Some(3), None]);
        let repo = SqliteSiteRepository::new(db.connection());
        assert_eq!(repo.count_posts(&account).unwrap(), 5);

        let mut store = SqliteObjectStore::new(db.connection());
        Deduplicator::new().run(&mut store, &account).unwrap();

        let blogs = repo.list_blogs(&account).unwrap();
        assert_eq!(blogs.len(), 1);
        let mut remote_ids: Vec<_> = repo
            .list_posts(&blogs[0].id)
            .unwrap()
            .into_iter()
            .map(|post| post.remote_id.map(|id| id.0))
            .collect();
        remote_ids.sort();
        assert_eq!(remote_ids, vec![None, None, Some(1), Some(1), Some(3)]);

        let log = repo.list_merge_log(10).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].survivor_id, blogs[0].id);
    }

    #[test]
    fn test_failed_commit_rolls_back() {
        let (db, account) = setup();
        let survivor = add_blog(&db, account, 2, &[None, None]);
        let loser = add_blog(&db, account, 2, &[Some(6), Some(7)]);
        let before = snapshot(&db, account);

        let mut store = SqliteObjectStore::new(db.connection());
        let mut plan = Deduplicator::new().deduplicate(&store, &account).unwrap();
        assert_eq!(plan.deletions, vec![loser]);

        // Only one of the loser's two posts is moved, so the delete must fail
        // after the first reparent has already run inside the transaction.
        plan.reparents.truncate(1);
        let result = store.commit(&plan);

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(snapshot(&db, account), before);
        let set = store.fetch_replicas(&account).unwrap();
        assert_eq!(set.post_count(&survivor), 2);
        assert_eq!(set.post_count(&loser), 2);
    }

    #[test]
    fn test_stale_reparent_rolls_back() {
        let (db, account) = setup();
        let survivor = add_blog(&db, account, 2, &[None]);
        let loser = add_blog(&db, account, 2, &[Some(1), Some(2)]);
        let other = add_blog(&db, account, 9, &[]);
        let before = snapshot(&db, account);

        let mut store = SqliteObjectStore::new(db.connection());
        let mut plan = Deduplicator::new().deduplicate(&store, &account).unwrap();
        let moved = plan.reparents[1].post;
        plan.reparents[1] = Reparent {
            post: moved,
            from: other,
            to: survivor,
        };

        assert!(matches!(store.commit(&plan), Err(Error::Validation(_))));
        assert_eq!(snapshot(&db, account), before);
        assert!(store.fetch_replicas(&account).unwrap().contains_blog(&loser));
    }

    #[test]
    fn test_second_run_is_noop() {
        let (db, account) = setup();
        add_blog(&db, account, 2, &[None]);
        add_blog(&db, account, 2, &[Some(1)]);

        let mut store = SqliteObjectStore::new(db.connection());
        let first = Deduplicator::new().run(&mut store, &account).unwrap();
        let after_first = snapshot(&db, account);
        let second = Deduplicator::new().run(&mut store, &account).unwrap();

        assert!(!first.is_noop());
        assert!(second.is_noop());
        assert_eq!(snapshot(&db, account), after_first);
    }

    #[test]
    fn test_owners_lists_accounts() {
        let (db, account) = setup();
        let store = SqliteObjectStore::new(db.connection());
        assert_eq!(store.owners().unwrap(), vec![account]);
    }
}
