use std::path::Path;

use sitecache_core::db::{SiteRepository, SqliteSiteRepository};

use crate::commands::common::{
    format_merge_log_lines, merge_log_to_item, open_database, MergeLogItem,
};
use crate::error::CliError;

pub fn run_history(limit: usize, as_json: bool, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let entries = SqliteSiteRepository::new(db.connection()).list_merge_log(limit)?;

    if as_json {
        let json_items = entries
            .iter()
            .map(merge_log_to_item)
            .collect::<Vec<MergeLogItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No merges recorded.");
        return Ok(());
    }

    for line in format_merge_log_lines(&entries) {
        println!("{line}");
    }
    Ok(())
}
