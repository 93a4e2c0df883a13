use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] sitecache_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Post title cannot be empty")]
    EmptyTitle,
    #[error("Identifier cannot be empty")]
    EmptyIdentifier,
    #[error("Account not found for id/prefix/username: {0}")]
    AccountNotFound(String),
    #[error("Blog not found for id/prefix: {0}")]
    BlogNotFound(String),
    #[error("{0}")]
    Ambiguous(String),
    #[error("XML-RPC endpoint must start with http:// or https://: {0}")]
    InvalidEndpoint(String),
    #[error("Invalid post status: {0}")]
    InvalidStatus(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Merge failed for {0} account(s); they will be retried on the next run")]
    SweepFailed(usize),
}
