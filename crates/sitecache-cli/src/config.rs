//! Persistent CLI configuration.

use std::fmt::Display;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use sitecache_core::util::normalize_text_option;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
pub const DEFAULT_LOG_FILTER: &str = "sitecache=info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            db_path: None,
            log_filter: None,
        }
    }
}

const fn default_config_version() -> u32 {
    1
}

fn config_error(action: &str, path: &Path, error: &impl Display) -> CliError {
    CliError::Config(format!("cannot {action} {}: {error}", path.display()))
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_default().join("sitecache")
}

pub fn default_config_path() -> PathBuf {
    app_dir(dirs::config_dir()).join(CONFIG_FILE_NAME)
}

pub fn default_db_path() -> PathBuf {
    app_dir(dirs::data_dir()).join("sitecache.db")
}

impl CliConfig {
    /// Read the config file; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(error) => return Err(config_error("read", path, &error)),
        };
        let mut config: Self =
            serde_json::from_str(&raw).map_err(|error| config_error("parse", path, &error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|error| config_error("create", dir, &error))?;
        }

        let mut config = self.clone();
        config.normalize();
        let json = serde_json::to_string_pretty(&config)?;
        fs::write(path, json).map_err(|error| config_error("write", path, &error))
    }

    /// Database path: explicit flag, then `SITECACHE_DB_PATH`, then config, then default
    pub fn resolve_db_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| env::var_os("SITECACHE_DB_PATH").map(PathBuf::from))
            .or_else(|| self.db_path.clone())
            .unwrap_or_else(default_db_path)
    }

    /// Log filter directive used when `RUST_LOG` is unset
    pub fn resolve_log_filter(&self, verbose: bool) -> String {
        if verbose {
            return "sitecache=debug".to_string();
        }
        self.log_filter
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }

    fn normalize(&mut self) {
        self.log_filter = normalize_text_option(self.log_filter.take());
        self.db_path = self
            .db_path
            .take()
            .filter(|path| !path.as_os_str().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn load_missing_file_returns_default() {
        let dir = tempdir().unwrap();
        let config = CliConfig::load_from_path(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn save_then_load_normalizes_blank_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = CliConfig {
            version: 1,
            db_path: Some(PathBuf::from("/tmp/cache.db")),
            log_filter: Some("   ".to_string()),
        };

        assert!(config.save_to_path(&path).is_ok());
        let loaded = CliConfig::load_from_path(&path).unwrap();

        assert_eq!(loaded.db_path, Some(PathBuf::from("/tmp/cache.db")));
        assert_eq!(loaded.log_filter, None);
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            CliConfig::load_from_path(&path),
            Err(CliError::Config(message)) if message.starts_with("cannot parse")
        ));
    }

    #[test]
    fn explicit_db_path_wins() {
        let config = CliConfig {
            db_path: Some(PathBuf::from("/from/config.db")),
            ..CliConfig::default()
        };
        assert_eq!(
            config.resolve_db_path(Some(PathBuf::from("/explicit.db"))),
            PathBuf::from("/explicit.db")
        );
    }

    #[test]
    fn verbose_overrides_log_filter() {
        let config = CliConfig {
            log_filter: Some("sitecache=warn".to_string()),
            ..CliConfig::default()
        };
        assert_eq!(config.resolve_log_filter(false), "sitecache=warn");
        assert_eq!(config.resolve_log_filter(true), "sitecache=debug");
    }
}
