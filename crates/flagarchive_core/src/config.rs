//! Process configuration resolved from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `FLAGARCHIVE_DB_PATH` | `<temp dir>/flagarchive.sqlite3` |
//! | `FLAGARCHIVE_LOG_LEVEL` | `default_log_level()` |
//! | `FLAGARCHIVE_LOG_DIR` | unset (file logging disabled) |
//! | `FLAGARCHIVE_DEFAULT_PAGE_SIZE` | 20 |
//! | `FLAGARCHIVE_MAX_PAGE_SIZE` | 100 |
//!
//! Blank values count as unset.

use crate::logging::default_log_level;
use crate::service::PageLimits;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FLAGARCHIVE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FLAGARCHIVE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FLAGARCHIVE_LOG_DIR";
pub const ENV_DEFAULT_PAGE_SIZE: &str = "FLAGARCHIVE_DEFAULT_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "FLAGARCHIVE_MAX_PAGE_SIZE";

const DEFAULT_DB_FILE_NAME: &str = "flagarchive.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { var: &'static str, value: String },
    InvalidPageLimits { default_size: u32, max_size: u32 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { var, value } => {
                write!(f, "{var} must be a positive integer, got `{value}`")
            }
            Self::InvalidPageLimits {
                default_size,
                max_size,
            } => write!(
                f,
                "default page size {default_size} exceeds max page size {max_size}"
            ),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub page_limits: PageLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_limits: PageLimits::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);

        if let Some(raw) = read(ENV_DEFAULT_PAGE_SIZE) {
            config.page_limits.default_size = parse_size(ENV_DEFAULT_PAGE_SIZE, raw)?;
        }
        if let Some(raw) = read(ENV_MAX_PAGE_SIZE) {
            config.page_limits.max_size = parse_size(ENV_MAX_PAGE_SIZE, raw)?;
        }
        if config.page_limits.default_size > config.page_limits.max_size {
            return Err(ConfigError::InvalidPageLimits {
                default_size: config.page_limits.default_size,
                max_size: config.page_limits.max_size,
            });
        }

        Ok(config)
    }
}

fn parse_size(var: &'static str, raw: String) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_DB_PATH, ENV_DEFAULT_PAGE_SIZE, ENV_MAX_PAGE_SIZE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.page_limits.max_size, 100);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn values_override_defaults_and_blank_is_unset() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /srv/flags.db "),
            (ENV_MAX_PAGE_SIZE, "50"),
            (ENV_DEFAULT_PAGE_SIZE, "   "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/srv/flags.db"));
        assert_eq!(config.page_limits.max_size, 50);
        assert_eq!(config.page_limits.default_size, 20);
    }

    #[test]
    fn rejects_non_numeric_and_inverted_limits() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_MAX_PAGE_SIZE, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var, .. } if var == ENV_MAX_PAGE_SIZE));

        let err = AppConfig::from_lookup(lookup(&[
            (ENV_DEFAULT_PAGE_SIZE, "80"),
            (ENV_MAX_PAGE_SIZE, "40"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPageLimits {
                default_size: 80,
                max_size: 40
            }
        );
    }
}
