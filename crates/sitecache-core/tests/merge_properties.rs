//! Property tests for the blog merge engine over generated caches.

use std::collections::HashSet;

use proptest::prelude::*;
use sitecache_core::merge::{plan_merge, MemoryStore, ObjectStore, ReplicaSet};
use sitecache_core::models::{Account, AccountId, Blog, BlogId, Post, PostId, RemoteId};
use sitecache_core::Deduplicator;

/// One generated blog: its remote id and, per post, whether it is local-only
type BlogSpec = (i64, Vec<bool>);

fn build_store(specs: &[BlogSpec]) -> (MemoryStore, AccountId) {
    let account = Account::new("prop");
    let mut store = MemoryStore::new();
    store.add_account(&account);

    for (remote_id, posts) in specs {
        let blog = Blog::new(account.id).with_remote_id(RemoteId(*remote_id));
        let blog_id = blog.id;
        store.add_blog(blog).unwrap();
        for (n, local_only) in posts.iter().enumerate() {
            let mut post = Post::new(blog_id, format!("Post {n}"));
            if !local_only {
                post.remote_id = Some(RemoteId(i64::try_from(n).unwrap() + 1));
            }
            store.add_post(&account.id, post).unwrap();
        }
    }

    (store, account.id)
}

fn post_ids(set: &ReplicaSet) -> HashSet<PostId> {
    set.blogs()
        .iter()
        .flat_map(|blog| set.posts_of(&blog.id).map(|post| post.id))
        .collect()
}

fn blog_specs() -> impl Strategy<Value = Vec<BlogSpec>> {
    prop::collection::vec((1..5i64, prop::collection::vec(any::<bool>(), 0..4)), 0..10)
}

proptest! {
    #[test]
    fn merge_conserves_every_post(specs in blog_specs()) {
        let (mut store, account) = build_store(&specs);
        let before = store.fetch_replicas(&account).unwrap();

        Deduplicator::new().run(&mut store, &account).unwrap();
        let after = store.fetch_replicas(&account).unwrap();

        prop_assert_eq!(after.total_posts(), before.total_posts());
        prop_assert_eq!(post_ids(&after), post_ids(&before));
    }

    #[test]
    fn merge_leaves_one_blog_per_key(specs in blog_specs()) {
        let (mut store, account) = build_store(&specs);

        Deduplicator::new().run(&mut store, &account).unwrap();
        let after = store.fetch_replicas(&account).unwrap();

        let keys: HashSet<_> = after.blogs().iter().map(Blog::equivalence_key).collect();
        prop_assert_eq!(keys.len(), after.len());
        let expected: HashSet<i64> = specs.iter().map(|(remote_id, _)| *remote_id).collect();
        prop_assert_eq!(after.len(), expected.len());
    }

    #[test]
    fn merge_is_idempotent(specs in blog_specs()) {
        let (mut store, account) = build_store(&specs);

        Deduplicator::new().run(&mut store, &account).unwrap();
        let once = store.fetch_replicas(&account).unwrap();
        let plan = Deduplicator::new().deduplicate(&store, &account).unwrap();

        prop_assert!(plan.is_empty());
        Deduplicator::new().run(&mut store, &account).unwrap();
        prop_assert_eq!(store.fetch_replicas(&account).unwrap(), once);
    }

    #[test]
    fn unique_blogs_produce_empty_plan(
        posts in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..4), 0..8)
    ) {
        let specs: Vec<BlogSpec> = posts
            .into_iter()
            .enumerate()
            .map(|(n, posts)| (i64::try_from(n).unwrap() + 1, posts))
            .collect();
        let (store, account) = build_store(&specs);

        let set = store.fetch_replicas(&account).unwrap();
        prop_assert!(plan_merge(&set).is_empty());
    }

    #[test]
    fn blog_with_drafts_always_survives(
        duplicates in 2..6usize,
        keeper in 0..6usize,
        drafts in 1..4usize,
    ) {
        let keeper = keeper % duplicates;
        let specs: Vec<BlogSpec> = (0..duplicates)
            .map(|n| {
                let posts = if n == keeper { vec![true; drafts] } else { vec![false; 2] };
                (7, posts)
            })
            .collect();
        let (mut store, account) = build_store(&specs);
        let expected: BlogId = store.fetch_replicas(&account).unwrap().blogs()[keeper].id;

        Deduplicator::new().run(&mut store, &account).unwrap();
        let after = store.fetch_replicas(&account).unwrap();

        prop_assert_eq!(after.len(), 1);
        prop_assert_eq!(after.blogs()[0].id, expected);
        prop_assert_eq!(after.local_only_count(&expected), drafts);
        prop_assert_eq!(after.post_count(&expected), drafts + 2 * (duplicates - 1));
    }

    #[test]
    fn rejected_commit_changes_nothing(specs in blog_specs()) {
        let (mut store, account) = build_store(&specs);
        let mut plan = Deduplicator::new().deduplicate(&store, &account).unwrap();
        prop_assume!(!plan.reparents.is_empty());

        plan.reparents.pop();
        let before = store.fetch_replicas(&account).unwrap();

        prop_assert!(store.commit(&plan).is_err());
        prop_assert_eq!(store.fetch_replicas(&account).unwrap(), before);
    }
}
