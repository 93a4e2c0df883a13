//! Row decoding shared by the repository and the object store

use std::error::Error as StdError;
use std::str::FromStr;

use rusqlite::types::Type;
use rusqlite::Row;

use crate::models::{Account, Blog, MergeLogEntry, Post, RemoteId};

pub const ACCOUNT_COLUMNS: &str = "id, username, created_at";
pub const BLOG_COLUMNS: &str = "id, account_id, remote_id, xmlrpc, url, name, created_at";
pub const POST_COLUMNS: &str = "id, blog_id, remote_id, title, status, created_at, updated_at";

/// Parse a text column into a typed value, surfacing bad data as a row error
fn parse_text<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Into<Box<dyn StdError + Send + Sync>>,
{
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|error: T::Err| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, error.into())
    })
}

fn remote_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<RemoteId>> {
    Ok(row.get::<_, Option<i64>>(idx)?.map(RemoteId))
}

pub fn parse_account(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: parse_text(row, 0)?,
        username: row.get(1)?,
        created_at: row.get(2)?,
    })
}

pub fn parse_blog(row: &Row<'_>) -> rusqlite::Result<Blog> {
    Ok(Blog {
        id: parse_text(row, 0)?,
        account_id: parse_text(row, 1)?,
        remote_id: remote_id(row, 2)?,
        xmlrpc: row.get(3)?,
        url: row.get(4)?,
        name: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn parse_post(row: &Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: parse_text(row, 0)?,
        blog_id: parse_text(row, 1)?,
        remote_id: remote_id(row, 2)?,
        title: row.get(3)?,
        status: parse_text(row, 4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn parse_merge_log(row: &Row<'_>) -> rusqlite::Result<MergeLogEntry> {
    Ok(MergeLogEntry {
        id: row.get(0)?,
        account_id: parse_text(row, 1)?,
        survivor_id: parse_text(row, 2)?,
        loser_id: parse_text(row, 3)?,
        posts_moved: get_count(row, 4)?,
        merged_at: row.get(5)?,
    })
}

/// Read a non-negative integer column as a count
pub fn get_count(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let value: i64 = row.get(idx)?;
    usize::try_from(value).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, error.into())
    })
}

/// Convert a count to an `SQLite` integer
pub fn count_param(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
