use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use sitecache_core::db::{Database, SiteRepository, SqliteSiteRepository};
use sitecache_core::merge::ReplicaSet;
use sitecache_core::models::{Account, Blog, MergeLogEntry, Post};

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct BlogListItem {
    pub id: String,
    pub label: String,
    pub remote_id: Option<i64>,
    pub xmlrpc: Option<String>,
    pub posts: usize,
    pub local_only_posts: usize,
}

#[derive(Debug, Serialize)]
pub struct MergeLogItem {
    pub id: i64,
    pub account_id: String,
    pub survivor_id: String,
    pub loser_id: String,
    pub posts_moved: usize,
    pub merged_at: i64,
    pub merged_at_iso: String,
}

pub fn open_database(db_path: &Path) -> Result<Database, CliError> {
    Ok(Database::open(db_path)?)
}

pub fn normalize_identifier(raw: &str) -> Result<String, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyIdentifier);
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Find an account by full id, exact username, or unique id prefix
pub fn resolve_account(identifier: &str, db: &Database) -> Result<Account, CliError> {
    let needle = normalize_identifier(identifier)?;
    let repo = SqliteSiteRepository::new(db.connection());
    let accounts = repo.list_accounts()?;

    if let Some(account) = accounts.iter().find(|account| {
        account.id.as_str() == needle || account.username.eq_ignore_ascii_case(&needle)
    }) {
        return Ok(account.clone());
    }

    let matches: Vec<&Account> = accounts
        .iter()
        .filter(|account| account.id.as_str().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Err(CliError::AccountNotFound(identifier.trim().to_string())),
        [account] => Ok((*account).clone()),
        _ => Err(CliError::Ambiguous(format!(
            "Account prefix '{}' matches {} accounts; use a longer prefix",
            identifier.trim(),
            matches.len()
        ))),
    }
}

/// Find a blog by full id or unique id prefix across all accounts
pub fn resolve_blog(identifier: &str, db: &Database) -> Result<Blog, CliError> {
    let needle = normalize_identifier(identifier)?;
    let repo = SqliteSiteRepository::new(db.connection());

    if let Ok(id) = needle.parse() {
        if let Some(blog) = repo.get_blog(&id)? {
            return Ok(blog);
        }
    }

    let mut matches = Vec::new();
    for account in repo.list_accounts()? {
        matches.extend(
            repo.list_blogs(&account.id)?
                .into_iter()
                .filter(|blog| blog.id.as_str().starts_with(&needle)),
        );
    }

    match matches.len() {
        0 => Err(CliError::BlogNotFound(identifier.trim().to_string())),
        1 => Ok(matches.remove(0)),
        count => Err(CliError::Ambiguous(format!(
            "Blog prefix '{}' matches {count} blogs; use a longer prefix",
            identifier.trim()
        ))),
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn blog_to_list_item(blog: &Blog, set: &ReplicaSet) -> BlogListItem {
    BlogListItem {
        id: blog.id.as_str(),
        label: blog.label(),
        remote_id: blog.remote_id.map(|id| id.0),
        xmlrpc: blog.xmlrpc.clone(),
        posts: set.post_count(&blog.id),
        local_only_posts: set.local_only_count(&blog.id),
    }
}

pub fn format_blog_lines(set: &ReplicaSet) -> Vec<String> {
    set.blogs()
        .iter()
        .map(|blog| {
            let remote = blog
                .remote_id
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            format!(
                "{:<13}  remote={:<10}  posts={:<4} local={:<4}  {}",
                short_id(&blog.id.as_str()),
                remote,
                set.post_count(&blog.id),
                set.local_only_count(&blog.id),
                blog.label()
            )
        })
        .collect()
}

pub fn format_post_lines(posts: &[Post]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    posts
        .iter()
        .map(|post| {
            let remote = post
                .remote_id
                .map_or_else(|| "local".to_string(), |id| id.to_string());
            format!(
                "{:<13}  {:<9}  {:<8}  {:<10}  {}",
                short_id(&post.id.as_str()),
                post.status,
                remote,
                format_relative_time(post.updated_at, now_ms),
                post.title
            )
        })
        .collect()
}

pub fn merge_log_to_item(entry: &MergeLogEntry) -> MergeLogItem {
    MergeLogItem {
        id: entry.id,
        account_id: entry.account_id.as_str(),
        survivor_id: entry.survivor_id.as_str(),
        loser_id: entry.loser_id.as_str(),
        posts_moved: entry.posts_moved,
        merged_at: entry.merged_at,
        merged_at_iso: format_timestamp(entry.merged_at),
    }
}

pub fn format_merge_log_lines(entries: &[MergeLogEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}  kept={}  deleted={}  moved={}",
                format_timestamp(entry.merged_at),
                short_id(&entry.survivor_id.as_str()),
                short_id(&entry.loser_id.as_str()),
                entry.posts_moved
            )
        })
        .collect()
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}
