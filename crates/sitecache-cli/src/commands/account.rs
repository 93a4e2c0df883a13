use std::path::Path;

use sitecache_core::db::{SiteRepository, SqliteSiteRepository};

use crate::commands::common::{format_timestamp, open_database};
use crate::error::CliError;

pub fn run_account_add(username: &str, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let repo = SqliteSiteRepository::new(db.connection());
    let account = repo.create_account(username)?;
    println!("{}", account.id);
    Ok(())
}

pub fn run_account_list(as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let repo = SqliteSiteRepository::new(db.connection());
    let accounts = repo.list_accounts()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
        return Ok(());
    }

    if accounts.is_empty() {
        println!("No accounts cached.");
        return Ok(());
    }

    for account in &accounts {
        println!(
            "{}  {:<20}  {}",
            account.id,
            account.username,
            format_timestamp(account.created_at)
        );
    }
    Ok(())
}
