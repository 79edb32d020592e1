//! Loader configuration
//!
//! Environment Variables:
//! - `REELDB_FIXTURE_DIR` - Root directory of JSON fixture datasets (default `./fixtures`)
//! - `REELDB_LOAD_TIMEOUT_SECS` - Upper bound on loading one dataset (default 180)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fixture directory variable
pub const FIXTURE_DIR_VAR: &str = "REELDB_FIXTURE_DIR";

/// Load timeout variable
pub const LOAD_TIMEOUT_VAR: &str = "REELDB_LOAD_TIMEOUT_SECS";

/// Default fixture directory
pub const DEFAULT_FIXTURE_DIR: &str = "./fixtures";

/// Default load timeout: three minutes
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(180);

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How and where datasets are loaded from
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub fixture_dir: PathBuf,
    pub load_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}

impl LoaderConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LoaderConfig::default();

        if let Some(dir) = lookup(FIXTURE_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config.fixture_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(LOAD_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    var: LOAD_TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    var: LOAD_TIMEOUT_VAR,
                    value: raw,
                    reason: "timeout must be positive".to_string(),
                });
            }
            config.load_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.load_timeout, Duration::from_secs(180));
        assert_eq!(config.fixture_dir, PathBuf::from("./fixtures"));
    }

    #[test]
    fn test_overrides() {
        let config = LoaderConfig::from_lookup(lookup(&[
            (FIXTURE_DIR_VAR, "/data/movies"),
            (LOAD_TIMEOUT_VAR, " 30 "),
        ]))
        .unwrap();
        assert_eq!(config.fixture_dir, PathBuf::from("/data/movies"));
        assert_eq!(config.load_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = LoaderConfig::from_lookup(lookup(&[(LOAD_TIMEOUT_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var, .. } if var == LOAD_TIMEOUT_VAR));

        assert!(LoaderConfig::from_lookup(lookup(&[(LOAD_TIMEOUT_VAR, "0")])).is_err());
    }

    #[test]
    fn test_builder() {
        let config = LoaderConfig::default()
            .with_fixture_dir("/tmp/x")
            .with_load_timeout(Duration::from_millis(5));
        assert_eq!(config.fixture_dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.load_timeout, Duration::from_millis(5));
    }
}
