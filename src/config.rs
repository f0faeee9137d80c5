// Optional YAML configuration

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

const APP_DIR: &str = "todostore";
const CONFIG_FILE: &str = "config.yml";
const DB_FILE: &str = "todo_pro.sqlite3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Settings read from `config.yml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub db_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    /// Colored terminal output
    pub color: Option<bool>,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default location is used
    /// if present, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// `<config dir>/todostore/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Database path: command-line value, then config, then `<data dir>/todostore/todo_pro.sqlite3`
    pub fn resolve_db_path(&self, cli: Option<PathBuf>) -> Result<PathBuf> {
        cli.or_else(|| self.db_path.clone())
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR).join(DB_FILE)))
            .ok_or_else(|| eyre!("Cannot determine a data directory; pass --db <PATH>"))
    }

    /// Log level: `-v` count wins over config, default WARN
    pub fn resolve_log_level(&self, verbose: u8) -> LevelFilter {
        match verbose {
            0 => self.log_level.map(LevelFilter::from).unwrap_or(LevelFilter::WARN),
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    pub fn resolve_color(&self, no_color: bool) -> bool {
        !no_color && self.color.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml("db_path: /tmp/tasks.sqlite3\nlog_level: debug\ncolor: false\n").unwrap();
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/tasks.sqlite3")));
        assert_eq!(config.log_level, Some(LogLevel::Debug));
        assert_eq!(config.color, Some(false));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("color: true").unwrap().db_path, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Config::from_yaml("database: x.db").is_err());
        assert!(Config::from_yaml("log_level: loud").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp.path().join("missing.yml"))).is_err());

        let path = temp.path().join("config.yml");
        fs::write(&path, "color: false\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().color, Some(false));
    }

    #[test]
    fn test_db_path_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("from-config.sqlite3")),
            ..Config::default()
        };

        let cli = Some(PathBuf::from("from-cli.sqlite3"));
        assert_eq!(config.resolve_db_path(cli).unwrap(), PathBuf::from("from-cli.sqlite3"));
        assert_eq!(config.resolve_db_path(None).unwrap(), PathBuf::from("from-config.sqlite3"));
    }

    #[test]
    fn test_default_db_path() {
        if let Some(data_dir) = dirs::data_dir() {
            assert_eq!(
                Config::default().resolve_db_path(None).unwrap(),
                data_dir.join("todostore").join("todo_pro.sqlite3")
            );
        }
    }

    #[test]
    fn test_log_level_and_color() {
        let config = Config {
            log_level: Some(LogLevel::Error),
            color: Some(false),
            ..Config::default()
        };
        assert_eq!(config.resolve_log_level(0), LevelFilter::ERROR);
        assert_eq!(config.resolve_log_level(2), LevelFilter::DEBUG);
        assert_eq!(Config::default().resolve_log_level(0), LevelFilter::WARN);

        assert!(!config.resolve_color(false));
        assert!(Config::default().resolve_color(false));
        assert!(!Config::default().resolve_color(true));
    }
}
