//! Site repository implementation

use crate::db::rows::{
    count_param, get_count, parse_account, parse_blog, parse_merge_log, parse_post,
    ACCOUNT_COLUMNS, BLOG_COLUMNS, POST_COLUMNS,
};
use crate::error::{Error, Result};
use crate::models::{Account, AccountId, Blog, BlogId, MergeLogEntry, Post};
use rusqlite::{params, Connection, OptionalExtension};

/// Trait for cached site storage operations
pub trait SiteRepository {
    /// Create a new account
    fn create_account(&self, username: &str) -> Result<Account>;

    /// Get an account by ID
    fn get_account(&self, id: &AccountId) -> Result<Option<Account>>;

    /// List all accounts, oldest first
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Insert a cached blog
    ///
    /// No duplicate check happens here; that is the merge engine's job.
    fn insert_blog(&self, blog: &Blog) -> Result<()>;

    /// Get a blog by ID
    fn get_blog(&self, id: &BlogId) -> Result<Option<Blog>>;

    /// List an account's blogs, oldest first
    fn list_blogs(&self, account_id: &AccountId) -> Result<Vec<Blog>>;

    /// Insert a post under its blog
    fn insert_post(&self, post: &Post) -> Result<()>;

    /// List a blog's posts, oldest first
    fn list_posts(&self, blog_id: &BlogId) -> Result<Vec<Post>>;

    /// Count posts across all of an account's blogs
    fn count_posts(&self, account_id: &AccountId) -> Result<usize>;

    /// Most recent merge log entries, newest first
    fn list_merge_log(&self, limit: usize) -> Result<Vec<MergeLogEntry>>;
}

/// `SQLite` implementation of `SiteRepository`
pub struct SqliteSiteRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSiteRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl SiteRepository for SqliteSiteRepository<'_> {
    fn create_account(&self, username: &str) -> Result<Account> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("Username cannot be empty".into()));
        }

        let account = Account::new(username);
        self.conn.execute(
            "INSERT INTO accounts (id, username, created_at) VALUES (?, ?, ?)",
            params![account.id.as_str(), account.username, account.created_at],
        )?;
        Ok(account)
    }

    fn get_account(&self, id: &AccountId) -> Result<Option<Account>> {
        let account = self
            .conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"),
                params![id.as_str()],
                parse_account,
            )
            .optional()?;
        Ok(account)
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at ASC, id ASC"
        ))?;

        let accounts = stmt
            .query_map([], parse_account)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(accounts)
    }

    fn insert_blog(&self, blog: &Blog) -> Result<()> {
        if self.get_account(&blog.account_id)?.is_none() {
            return Err(Error::NotFound(format!("account {}", blog.account_id)));
        }

        self.conn.execute(
            "INSERT INTO blogs (id, account_id, remote_id, xmlrpc, url, name, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                blog.id.as_str(),
                blog.account_id.as_str(),
                blog.remote_id.map(|id| id.0),
                blog.xmlrpc,
                blog.url,
                blog.name,
                blog.created_at
            ],
        )?;
        Ok(())
    }

    fn get_blog(&self, id: &BlogId) -> Result<Option<Blog>> {
        let blog = self
            .conn
            .query_row(
                &format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?"),
                params![id.as_str()],
                parse_blog,
            )
            .optional()?;
        Ok(blog)
    }

    fn list_blogs(&self, account_id: &AccountId) -> Result<Vec<Blog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE account_id = ? ORDER BY created_at ASC, id ASC"
        ))?;

        let blogs = stmt
            .query_map(params![account_id.as_str()], parse_blog)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(blogs)
    }

    fn insert_post(&self, post: &Post) -> Result<()> {
        if post.title.trim().is_empty() {
            return Err(Error::InvalidInput("Post title cannot be empty".into()));
        }
        if self.get_blog(&post.blog_id)?.is_none() {
            return Err(Error::NotFound(format!("blog {}", post.blog_id)));
        }

        self.conn.execute(
            "INSERT INTO posts (id, blog_id, remote_id, title, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                post.id.as_str(),
                post.blog_id.as_str(),
                post.remote_id.map(|id| id.0),
                post.title,
                post.status.as_str(),
                post.created_at,
                post.updated_at
            ],
        )?;
        Ok(())
    }

    fn list_posts(&self, blog_id: &BlogId) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE blog_id = ? ORDER BY created_at ASC, id ASC"
        ))?;

        let posts = stmt
            .query_map(params![blog_id.as_str()], parse_post)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(posts)
    }

    fn count_posts(&self, account_id: &AccountId) -> Result<usize> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM posts p JOIN blogs b ON p.blog_id = b.id WHERE b.account_id = ?",
            params![account_id.as_str()],
            |row| get_count(row, 0),
        )?;
        Ok(count)
    }

    fn list_merge_log(&self, limit: usize) -> Result<Vec<MergeLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, account_id, survivor_id, loser_id, posts_moved, merged_at
             FROM merge_log
             ORDER BY merged_at DESC, id DESC
             LIMIT ?",
        )?;

        let entries = stmt
            .query_map(params![count_param(limit)], parse_merge_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries)
    }
}
