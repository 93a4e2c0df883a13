use std::path::{Path, PathBuf};

use crate::config::CliConfig;
use crate::error::CliError;

pub fn run_config_show(
    config: &CliConfig,
    config_path: &Path,
    db_path: &Path,
) -> Result<(), CliError> {
    println!("config file: {}", config_path.display());
    println!("database:    {}", db_path.display());
    println!("log filter:  {}", config.resolve_log_filter(false));
    Ok(())
}

pub fn run_config_set_db_path(
    mut config: CliConfig,
    config_path: &Path,
    db_path: PathBuf,
) -> Result<(), CliError> {
    config.db_path = Some(db_path);
    config.save_to_path(config_path)?;
    println!("{}", config_path.display());
    Ok(())
}

pub fn run_config_set_log_filter(
    mut config: CliConfig,
    config_path: &Path,
    filter: &str,
) -> Result<(), CliError> {
    let filter = filter.trim();
    crate::build_env_filter(None, filter)?;
    config.log_filter = Some(filter.to_string());
    config.save_to_path(config_path)?;
    println!("{}", config_path.display());
    Ok(())
}
