//! In-memory snapshot of one account's cached blogs and posts.
//!
//! Blogs and posts live in an arena keyed by id. Ownership edges are the
//! `Post::blog_id` fields plus an explicit child index per blog, so no
//! object holds a reference to another.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::models::{AccountId, Blog, BlogId, Post, PostId};

use super::MergePlan;

/// Every blog of one account together with the posts it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaSet {
    account_id: AccountId,
    blogs: Vec<Blog>,
    posts: HashMap<PostId, Post>,
    children: HashMap<BlogId, Vec<PostId>>,
}

impl ReplicaSet {
    /// Create an empty set for the given account
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            blogs: Vec::new(),
            posts: HashMap::new(),
            children: HashMap::new(),
        }
    }

    /// Build a set from loaded rows, checking that every edge resolves
    pub fn from_parts(
        account_id: AccountId,
        blogs: impl IntoIterator<Item = Blog>,
        posts: impl IntoIterator<Item = Post>,
    ) -> Result<Self> {
        let mut set = Self::new(account_id);
        for blog in blogs {
            set.insert_blog(blog)?;
        }
        for post in posts {
            set.insert_post(post)?;
        }
        Ok(set)
    }

    pub fn insert_blog(&mut self, blog: Blog) -> Result<()> {
        if blog.account_id != self.account_id {
            return Err(Error::InvalidInput(format!(
                "blog {} belongs to account {}, not {}",
                blog.id, blog.account_id, self.account_id
            )));
        }
        if self.children.contains_key(&blog.id) {
            return Err(Error::InvalidInput(format!("blog {} inserted twice", blog.id)));
        }
        self.children.insert(blog.id, Vec::new());
        self.blogs.push(blog);
        Ok(())
    }

    pub fn insert_post(&mut self, post: Post) -> Result<()> {
        if self.posts.contains_key(&post.id) {
            return Err(Error::InvalidInput(format!("post {} inserted twice", post.id)));
        }
        let children = self
            .children
            .get_mut(&post.blog_id)
            .ok_or_else(|| Error::NotFound(format!("blog {}", post.blog_id)))?;
        children.push(post.id);
        self.posts.insert(post.id, post);
        Ok(())
    }

    pub const fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Blogs in load order
    pub fn blogs(&self) -> &[Blog] {
        &self.blogs
    }

    pub fn blog(&self, id: &BlogId) -> Option<&Blog> {
        self.blogs.iter().find(|blog| blog.id == *id)
    }

    pub fn contains_blog(&self, id: &BlogId) -> bool {
        self.children.contains_key(id)
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.get(id)
    }

    /// Posts owned by a blog, in insertion order
    pub fn posts_of<'a>(&'a self, blog_id: &BlogId) -> impl Iterator<Item = &'a Post> + 'a {
        self.children
            .get(blog_id)
            .into_iter()
            .flatten()
            .filter_map(|post_id| self.posts.get(post_id))
    }

    pub fn post_count(&self, blog_id: &BlogId) -> usize {
        self.children.get(blog_id).map_or(0, Vec::len)
    }

    /// Number of posts under a blog that were never uploaded
    pub fn local_only_count(&self, blog_id: &BlogId) -> usize {
        self.posts_of(blog_id).filter(|post| post.is_local_only()).count()
    }

    pub fn total_posts(&self) -> usize {
        self.posts.len()
    }

    pub fn len(&self) -> usize {
        self.blogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blogs.is_empty()
    }

    /// Apply a staged plan, all or nothing.
    ///
    /// The plan is checked against the current graph first; on any mismatch
    /// an error is returned and `self` is left untouched.
    pub fn apply(&mut self, plan: &MergePlan) -> Result<()> {
        self.validate(plan)?;

        for reparent in &plan.reparents {
            if let Some(children) = self.children.get_mut(&reparent.from) {
                children.retain(|id| *id != reparent.post);
            }
            if let Some(children) = self.children.get_mut(&reparent.to) {
                children.push(reparent.post);
            }
            if let Some(post) = self.posts.get_mut(&reparent.post) {
                post.blog_id = reparent.to;
            }
        }

        let deleted: HashSet<BlogId> = plan.deletions.iter().copied().collect();
        self.blogs.retain(|blog| !deleted.contains(&blog.id));
        self.children.retain(|id, _| !deleted.contains(id));
        Ok(())
    }

    fn validate(&self, plan: &MergePlan) -> Result<()> {
        if plan.account_id != self.account_id {
            return Err(Error::Validation(format!(
                "plan for account {} applied to account {}",
                plan.account_id, self.account_id
            )));
        }

        let deleted: HashSet<BlogId> = plan.deletions.iter().copied().collect();
        if let Some(missing) = deleted.iter().find(|id| !self.contains_blog(id)) {
            return Err(Error::Validation(format!("blog {missing} no longer exists")));
        }

        let mut remaining: HashMap<BlogId, usize> = deleted
            .iter()
            .map(|id| (*id, self.post_count(id)))
            .collect();
        let mut moved = HashSet::new();

        for reparent in &plan.reparents {
            if !moved.insert(reparent.post) {
                return Err(Error::Validation(format!(
                    "post {} moved twice",
                    reparent.post
                )));
            }
            let post = self.posts.get(&reparent.post).ok_or_else(|| {
                Error::Validation(format!("post {} no longer exists", reparent.post))
            })?;
            if post.blog_id != reparent.from {
                return Err(Error::Validation(format!(
                    "post {} is no longer on blog {}",
                    reparent.post, reparent.from
                )));
            }
            if !self.contains_blog(&reparent.to) || deleted.contains(&reparent.to) {
                return Err(Error::Validation(format!(
                    "target blog {} is missing or being deleted",
                    reparent.to
                )));
            }
            if let Some(count) = remaining.get_mut(&reparent.from) {
                *count -= 1;
            }
        }

        if let Some((blog_id, count)) = remaining.iter().find(|(_, count)| **count > 0) {
            return Err(Error::Validation(format!(
                "blog {blog_id} would be deleted with {count} posts still attached"
            )));
        }
        Ok(())
    }
}
