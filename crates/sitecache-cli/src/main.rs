//! sitecache CLI - inspect the local site cache and merge duplicate blogs

mod cli;
mod commands;
mod config;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{AccountCommands, BlogCommands, Cli, Commands, ConfigCommands, PostCommands};
use crate::commands::account::{run_account_add, run_account_list};
use crate::commands::blog::{run_blog_add, run_blog_list, NewBlog};
use crate::commands::completions::run_completions;
use crate::commands::config::{run_config_set_db_path, run_config_set_log_filter, run_config_show};
use crate::commands::dedup::run_dedup;
use crate::commands::history::run_history;
use crate::commands::post::{run_post_add, run_post_list};
use crate::config::{default_config_path, CliConfig, DEFAULT_LOG_FILTER};
use crate::error::CliError;

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = CliConfig::load_from_path(&config_path)?;

    init_tracing(&config.resolve_log_filter(cli.verbose));

    let db_path = config.resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Account { command } => match command {
            AccountCommands::Add { username } => run_account_add(&username, &db_path)?,
            AccountCommands::List { json } => run_account_list(json, &db_path)?,
        },
        Commands::Blog { command } => match command {
            BlogCommands::Add {
                account,
                remote_id,
                xmlrpc,
                url,
                name,
            } => {
                let fields = NewBlog {
                    remote_id,
                    xmlrpc,
                    url,
                    name,
                };
                run_blog_add(&account, fields, &db_path)?;
            }
            BlogCommands::List { account, json } => run_blog_list(&account, json, &db_path)?,
        },
        Commands::Post { command } => match command {
            PostCommands::Add {
                blog,
                remote_id,
                status,
                title,
            } => run_post_add(&blog, remote_id, &status, &title, &db_path)?,
            PostCommands::List { blog, json } => run_post_list(&blog, json, &db_path)?,
        },
        Commands::Dedup {
            account,
            dry_run,
            json,
        } => run_dedup(account.as_deref(), dry_run, json, &db_path)?,
        Commands::History { limit, json } => run_history(limit, json, &db_path)?,
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(&config, &config_path, &db_path)?,
            ConfigCommands::SetDbPath { path } => {
                run_config_set_db_path(config, &config_path, path)?;
            }
            ConfigCommands::SetLogFilter { filter } => {
                run_config_set_log_filter(config, &config_path, &filter)?;
            }
        },
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

fn init_tracing(configured_filter: &str) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = match build_env_filter(from_env.as_deref(), configured_filter) {
        Ok(filter) => (filter, None),
        Err(error) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(error)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(error) = rejected {
        tracing::warn!("{error}; using {DEFAULT_LOG_FILTER}");
    }
}

/// `RUST_LOG` when it holds a valid filter, otherwise the configured one
fn build_env_filter(from_env: Option<&str>, configured: &str) -> Result<EnvFilter, CliError> {
    if let Some(filter) = from_env.and_then(|value| EnvFilter::try_new(value).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured)
        .map_err(|error| CliError::Config(format!("invalid log filter '{configured}': {error}")))
}
