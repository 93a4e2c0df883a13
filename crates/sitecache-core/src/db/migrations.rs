//! Database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Statements for each schema version, starting at version 1
const MIGRATIONS: [&[&str]; 2] = [V1_STATEMENTS, V2_STATEMENTS];

/// Run all pending migrations
pub fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn)?;

    for (target, statements) in (1..=CURRENT_VERSION).zip(MIGRATIONS) {
        if version < target {
            apply(conn, target, statements)?;
        }
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Version 1: accounts, cached blogs and their posts
const V1_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY
    )",
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        username TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )",
    // No uniqueness on (account_id, remote_id, xmlrpc): racing upserts can
    // insert the same site twice and the merge engine cleans that up.
    "CREATE TABLE IF NOT EXISTS blogs (
        id TEXT PRIMARY KEY,
        account_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        remote_id INTEGER,
        xmlrpc TEXT,
        url TEXT,
        name TEXT,
        created_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_blogs_account ON blogs(account_id)",
    "CREATE TABLE IF NOT EXISTS posts (
        id TEXT PRIMARY KEY,
        blog_id TEXT NOT NULL REFERENCES blogs(id) ON DELETE RESTRICT,
        remote_id INTEGER,
        title TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'draft',
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_posts_blog ON posts(blog_id)",
];

/// Version 2: audit trail of committed merges
const V2_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS merge_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id TEXT NOT NULL,
        survivor_id TEXT NOT NULL,
        loser_id TEXT NOT NULL,
        posts_moved INTEGER NOT NULL,
        merged_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_merge_log_merged_at ON merge_log(merged_at DESC)",
];

/// Apply one migration and record its version in a single transaction
fn apply(conn: &Connection, version: i32, statements: &[&str]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for stmt in statements {
        tx.execute(stmt, [])?;
    }
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?)",
        [version],
    )?;
    tx.commit()?;

    tracing::info!("Migrated database to version {version}");
    Ok(())
}
