//! Configuration for the catalog browser.
//!
//! Values come from built-in defaults, optionally a TOML file, and finally
//! `CATALOG_*` environment variables, each layer overriding the previous one.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::debounce::DEFAULT_DEBOUNCE;
use crate::catalog::DEFAULT_BASE_URL;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "CATALOG_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "CATALOG_TIMEOUT_MS";
pub const ENV_DEBOUNCE_MS: &str = "CATALOG_DEBOUNCE_MS";
pub const ENV_FAVORITES_PATH: &str = "CATALOG_FAVORITES_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub debounce: Duration,
    pub favorites_path: PathBuf,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            favorites_path: default_favorites_path(),
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_ms: Option<u64>,
    debounce_ms: Option<u64>,
    favorites_path: Option<PathBuf>,
}

impl BrowserConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by the keys present in `content`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let mut config = Self::default();
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(ms) = file.timeout_ms {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.debounce_ms {
            config.debounce = Duration::from_millis(ms);
        }
        if let Some(path) = file.favorites_path {
            config.favorites_path = path;
        }
        Ok(config)
    }

    /// Reads `path` when given, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `CATALOG_*` overrides resolved through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.request_timeout = parse_millis(ENV_TIMEOUT_MS, raw)?;
        }
        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            self.debounce = parse_millis(ENV_DEBOUNCE_MS, raw)?;
        }
        if let Some(path) = lookup(ENV_FAVORITES_PATH) {
            self.favorites_path = PathBuf::from(path);
        }
        Ok(self)
    }
}

fn parse_millis(key: &'static str, raw: String) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(ms) => Ok(Duration::from_millis(ms)),
        Err(_) => Err(ConfigError::Invalid { key, value: raw }),
    }
}

/// `$HOME/.config/catalog-browser/favorites-v1.json`, relative to the working
/// directory when `HOME` is unset.
pub fn default_favorites_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join(".config")
        .join("catalog-browser")
        .join("favorites-v1.json")
}
