use std::path::Path;

use sitecache_core::db::{SiteRepository, SqliteObjectStore, SqliteSiteRepository};
use sitecache_core::merge::ObjectStore;
use sitecache_core::models::{AccountId, Blog, RemoteId};
use sitecache_core::util::is_http_url;

use crate::commands::common::{
    blog_to_list_item, format_blog_lines, open_database, resolve_account, BlogListItem,
};
use crate::error::CliError;

#[derive(Debug, Default)]
pub struct NewBlog {
    pub remote_id: Option<i64>,
    pub xmlrpc: Option<String>,
    pub url: Option<String>,
    pub name: Option<String>,
}

pub fn build_blog(account: AccountId, fields: NewBlog) -> Blog {
    let mut blog = Blog::new(account);
    if let Some(remote_id) = fields.remote_id {
        blog = blog.with_remote_id(RemoteId(remote_id));
    }
    if let Some(xmlrpc) = fields.xmlrpc {
        blog = blog.with_xmlrpc(xmlrpc);
    }
    if let Some(url) = fields.url {
        blog = blog.with_url(url);
    }
    if let Some(name) = fields.name {
        blog = blog.with_name(name);
    }
    blog
}

pub fn run_blog_add(account: &str, fields: NewBlog, db_path: &Path) -> Result<(), CliError> {
    if let Some(xmlrpc) = fields.xmlrpc.as_deref().map(str::trim) {
        if !xmlrpc.is_empty() && !is_http_url(xmlrpc) {
            return Err(CliError::InvalidEndpoint(xmlrpc.to_string()));
        }
    }

    let db = open_database(db_path)?;
    let account = resolve_account(account, &db)?;
    let blog = build_blog(account.id, fields);

    SqliteSiteRepository::new(db.connection()).insert_blog(&blog)?;
    println!("{}", blog.id);
    Ok(())
}

pub fn run_blog_list(account: &str, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let account = resolve_account(account, &db)?;
    let set = SqliteObjectStore::new(db.connection()).fetch_replicas(&account.id)?;

    if as_json {
        let json_items = set
            .blogs()
            .iter()
            .map(|blog| blog_to_list_item(blog, &set))
            .collect::<Vec<BlogListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if set.is_empty() {
        println!("No blogs cached for {}.", account.username);
        return Ok(());
    }

    for line in format_blog_lines(&set) {
        println!("{line}");
    }
    Ok(())
}
