//! Database layer for sitecache

mod connection;
mod migrations;
mod repository;
mod rows;
mod store;

pub use connection::Database;
pub use repository::{SiteRepository, SqliteSiteRepository};
pub use store::SqliteObjectStore;
