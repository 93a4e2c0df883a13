use std::path::Path;

use sitecache_core::db::SqliteObjectStore;
use sitecache_core::merge::{MergeReport, SweepReport};
use sitecache_core::Deduplicator;

use crate::commands::common::{open_database, resolve_account, short_id};
use crate::error::CliError;

pub fn run_dedup(
    account: Option<&str>,
    dry_run: bool,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let mut store = SqliteObjectStore::new(db.connection());
    let dedup = Deduplicator::new().dry_run(dry_run);

    let sweep = if let Some(account) = account {
        let account = resolve_account(account, &db)?;
        SweepReport {
            reports: vec![dedup.run(&mut store, &account.id)?],
            failures: Vec::new(),
        }
    } else {
        dedup.run_all(&mut store)?
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&sweep)?);
    } else {
        for line in format_sweep_lines(&sweep, dedup.is_dry_run()) {
            println!("{line}");
        }
    }

    if sweep.failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::SweepFailed(sweep.failures.len()))
    }
}

pub fn format_sweep_lines(sweep: &SweepReport, dry_run: bool) -> Vec<String> {
    let mut lines: Vec<String> = sweep
        .reports
        .iter()
        .flat_map(|report| format_report_lines(report, dry_run))
        .collect();

    for (account, error) in &sweep.failures {
        lines.push(format!("{}  failed: {error}", short_id(&account.as_str())));
    }

    if lines.is_empty() {
        lines.push("No duplicate blogs found.".to_string());
    }
    lines
}

fn format_report_lines(report: &MergeReport, dry_run: bool) -> Vec<String> {
    let verb = if dry_run { "would keep" } else { "kept" };
    report
        .classes
        .iter()
        .map(|class| {
            let losers = class
                .losers
                .iter()
                .map(|id| short_id(&id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{}  {verb} {}  removing [{losers}]  moving {} posts ({} local-only)",
                short_id(&report.account_id.as_str()),
                short_id(&class.survivor.as_str()),
                class.posts_moved,
                class.local_only_moved
            )
        })
        .collect()
}
