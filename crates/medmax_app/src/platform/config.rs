use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use medmax_client::ClientSettings;
use medmax_core::pricing::PricingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub(crate) const CONFIG_FILENAME: &str = "medmax.ron";
pub(crate) const API_BASE_ENV: &str = "MEDMAX_API_BASE";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Everything the host needs at startup, read from `medmax.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_response_bytes: u64,
    /// Holds the persisted session file.
    pub state_dir: PathBuf,
    /// URL the router boots at.
    pub start_url: String,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub pricing: PricingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_base_url: client.base_url,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_response_bytes: client.max_bytes,
            state_dir: PathBuf::from("."),
            start_url: "/".to_string(),
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
            pricing: PricingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides; `lookup` is `std::env::var` outside tests.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = base.trim().to_string();
        }
        self
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_response_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.client_settings(), ClientSettings::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"(
                api_base_url: "https://api.medicaremax.test",
                request_timeout_secs: 5,
                log_destination: Both,
                log_level: "debug",
            )"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.medicaremax.test");
        assert_eq!(config.client_settings().request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "(api_base_url: 42").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_the_api_base() {
        let config = AppConfig::default().with_env(|key| {
            (key == API_BASE_ENV).then(|| " http://10.0.0.2:9000 ".to_string())
        });
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");

        let untouched = AppConfig::default().with_env(|_| Some(String::new()));
        assert_eq!(untouched.api_base_url, AppConfig::default().api_base_url);
    }

    #[test]
    fn bad_log_level_is_reported() {
        let config = AppConfig {
            log_level: "loud".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.level_filter(), Err(ConfigError::LogLevel(_))));
    }
}
