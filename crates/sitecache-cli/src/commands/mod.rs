pub mod account;
pub mod blog;
pub mod common;
pub mod completions;
pub mod config;
pub mod dedup;
pub mod history;
pub mod post;
