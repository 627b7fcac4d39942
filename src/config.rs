//! Dashboard configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. a TOML file (`AIRSIGHT_CONFIG`, or `airsight.toml` in the working
//!    directory if present),
//! 3. environment variables, including any loaded from `.env`.
//!
//! ```toml
//! base_url = "http://127.0.0.1:8000"
//! timeout_secs = 12
//! default_city = "Delhi"
//! store_path = "airsight_state.json"
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::logging::LogLevel;

pub const DEFAULT_CONFIG_FILE: &str = "airsight.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Origin of the AirSight API, without the `/api/v1` prefix.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// City searched when the input is empty.
    pub default_city: String,
    /// Hours of forecast requested.
    pub forecast_horizon: u32,
    /// Where the last searched city is kept between runs.
    pub store_path: PathBuf,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 12,
            default_city: "Delhi".to_string(),
            forecast_horizon: 24,
            store_path: PathBuf::from("airsight_state.json"),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `path` (or the default locations), then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("AIRSIGHT_CONFIG").map(PathBuf::from));

        let mut config = match explicit {
            Some(p) => Self::from_file(&p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `AIRSIGHT_*` overrides looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("AIRSIGHT_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("AIRSIGHT_TIMEOUT_SECS") {
            self.timeout_secs = v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "AIRSIGHT_TIMEOUT_SECS",
                message: format!("expected whole seconds, got {:?}", v),
            })?;
        }
        if let Some(v) = lookup("AIRSIGHT_DEFAULT_CITY") {
            self.default_city = v;
        }
        if let Some(v) = lookup("AIRSIGHT_STORE_PATH") {
            self.store_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("AIRSIGHT_LOG") {
            self.log_level = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url",
            message: e.to_string(),
        })?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.default_city.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "default_city",
                message: "must not be empty".to_string(),
            });
        }
        if self.forecast_horizon == 0 {
            return Err(ConfigError::Invalid {
                key: "forecast_horizon",
                message: "must be at least 1".to_string(),
            });
        }
        self.log_level()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log_level
            .parse()
            .map_err(|message| ConfigError::Invalid {
                key: "log_level",
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        config.validate().expect("defaults should validate");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert_eq!(config.default_city, "Delhi");
        assert_eq!(config.forecast_horizon, 24);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml_str(
            r#"
            base_url = "https://airsight.example.org"
            timeout_secs = 5
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(config.base_url, "https://airsight.example.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.default_city, "Delhi");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(DashboardConfig::from_toml_str("colour = \"blue\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("AIRSIGHT_BASE_URL", "http://10.0.0.5:9000"),
            ("AIRSIGHT_TIMEOUT_SECS", "3"),
            ("AIRSIGHT_DEFAULT_CITY", "Mumbai"),
            ("AIRSIGHT_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config
            .apply_env(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.default_city, "Mumbai");
        assert_eq!(config.log_level().unwrap(), LogLevel::Debug);
    }

    #[test]
    fn test_bad_timeout_env_is_reported() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_env(|k| (k == "AIRSIGHT_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("AIRSIGHT_TIMEOUT_SECS"));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = DashboardConfig::default();
        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.default_city = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("airsight.toml");
        std::fs::write(&path, "default_city = \"Bengaluru\"\n").unwrap();
        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.default_city, "Bengaluru");

        let missing = DashboardConfig::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
