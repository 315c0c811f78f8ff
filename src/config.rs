// src/config.rs

use crate::constants::{APP_DIR_NAME, DB_FILE_NAME, DEFAULT_LOG_FILTER};
use crate::error::{Result, TrackerError};
use crate::models::IntervalPolicy;
use std::fs;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CP_TRACKER_DB";
pub const ENV_INTERVALS: &str = "CP_TRACKER_INTERVALS";
pub const ENV_LOG: &str = "CP_TRACKER_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub interval_policy: IntervalPolicy,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Config {
            db_path: data_dir.join(APP_DIR_NAME).join(DB_FILE_NAME),
            interval_policy: IntervalPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for the `CP_TRACKER_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(policy) = lookup(ENV_INTERVALS).filter(|v| !v.trim().is_empty()) {
            config.interval_policy = policy
                .trim()
                .parse::<IntervalPolicy>()
                .map_err(|e: String| TrackerError::InvalidValue(format!("{}: {}", ENV_INTERVALS, e)))?;
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Creates the directory holding the database file if it is missing.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.interval_policy, IntervalPolicy::FirstStep);
        assert_eq!(config.log_filter, "info");
        assert!(config.db_path.ends_with("cp-tracker/tracker.db"));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/cp/progress.db"),
            (ENV_INTERVALS, "progressive"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/cp/progress.db"));
        assert_eq!(config.interval_policy, IntervalPolicy::Progressive);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[(ENV_DB_PATH, "  "), (ENV_INTERVALS, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn bad_policy_is_an_error() {
        let err = Config::from_lookup(lookup(&[(ENV_INTERVALS, "fibonacci")]));
        assert!(matches!(err, Err(TrackerError::InvalidValue(_))));
    }
}
