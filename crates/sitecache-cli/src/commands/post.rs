use std::path::Path;

use sitecache_core::db::{SiteRepository, SqliteSiteRepository};
use sitecache_core::models::{Post, PostStatus, RemoteId};

use crate::commands::common::{format_post_lines, open_database, resolve_blog};
use crate::error::CliError;

pub fn normalize_title(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

pub fn run_post_add(
    blog: &str,
    remote_id: Option<i64>,
    status: &str,
    title_parts: &[String],
    db_path: &Path,
) -> Result<(), CliError> {
    let title = normalize_title(&title_parts.join(" ")).ok_or(CliError::EmptyTitle)?;
    let status: PostStatus = status.parse().map_err(CliError::InvalidStatus)?;

    let db = open_database(db_path)?;
    let blog = resolve_blog(blog, &db)?;

    let mut post = Post::new(blog.id, title).with_status(status);
    if let Some(remote_id) = remote_id {
        post = post.with_remote_id(RemoteId(remote_id));
    }
    SqliteSiteRepository::new(db.connection()).insert_post(&post)?;

    println!("{}", post.id);
    Ok(())
}

pub fn run_post_list(blog: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let blog = resolve_blog(blog, &db)?;
    let posts = SqliteSiteRepository::new(db.connection()).list_posts(&blog.id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts cached for {}.", blog.label());
        return Ok(());
    }

    for line in format_post_lines(&posts) {
        println!("{line}");
    }
    Ok(())
}
