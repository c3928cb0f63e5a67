//! Client configuration.
//!
//! Layers, lowest to highest priority:
//! 1. Built-in defaults (`http://127.0.0.1:5000`, `/models`, `/search`, no timeout)
//! 2. `~/.molsearch/config.toml`
//! 3. Environment (`MOLSEARCH_URL`, `MOLSEARCH_TIMEOUT_SECS`), including values
//!    loaded from `.env` files by [`load_dotenv`]
//! 4. Explicit overrides from the caller (e.g. `--url`)

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MODELS_PATH: &str = "/models";
pub const DEFAULT_SEARCH_PATH: &str = "/search";

pub const ENV_URL: &str = "MOLSEARCH_URL";
pub const ENV_TIMEOUT: &str = "MOLSEARCH_TIMEOUT_SECS";

/// Load environment variables from .env files
///
/// Current directory first, then ~/.molsearch/.env. dotenvy never overwrites
/// variables that are already set, so the first file to define a key wins.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.molsearch)");
    }
}

/// Config directory: ~/.molsearch
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".molsearch"))
}

/// Config file path: ~/.molsearch/config.toml
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// On-disk shape of config.toml; every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: Option<String>,
    models_path: Option<String>,
    search_path: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Resolved backend location and HTTP settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub models_path: String,
    pub search_path: String,
    /// `None` = wait forever, like a browser fetch
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            models_path: DEFAULT_MODELS_PATH.to_string(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, then ~/.molsearch/config.toml if present, then process environment
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = Self::from_file(path.as_deref())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overlaid with a config file. A missing file is not an error.
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let Some(path) = path else {
            return Ok(config);
        };
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(url) = file.base_url {
            config = config.with_base_url(&url)?;
        }
        if let Some(p) = file.models_path {
            config.models_path = p;
        }
        if let Some(p) = file.search_path {
            config.search_path = p;
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Some(parse_timeout(&secs.to_string())?);
        }

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Overlay environment values read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL).filter(|v| !v.trim().is_empty()) {
            *self = self.clone().with_base_url(&url)?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            self.request_timeout = Some(parse_timeout(&secs)?);
        }
        Ok(())
    }

    /// Replace the base URL after checking it is absolute http(s)
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid_url(url));
        }
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn models_url(&self) -> String {
        join(&self.base_url, &self.models_path)
    }

    pub fn search_url(&self) -> String {
        join(&self.base_url, &self.search_path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_timeout(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::invalid_timeout(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.models_url(), "http://127.0.0.1:5000/models");
        assert_eq!(config.search_url(), "http://127.0.0.1:5000/search");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::from_file(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url = \"https://mols.example.org/\"\nsearch_path = \"api/search\"\nrequest_timeout_secs = 30"
        )
        .unwrap();

        let config = ClientConfig::from_file(Some(file.path())).unwrap();
        assert_eq!(config.search_url(), "https://mols.example.org/api/search");
        assert_eq!(config.models_url(), "https://mols.example.org/models");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base = \"http://x\"").unwrap();
        let err = ClientConfig::from_file(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            (ENV_URL, "http://10.0.0.2:8080"),
            (ENV_TIMEOUT, "5"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ClientConfig::default().with_base_url("localhost:5000"),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let mut config = ClientConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_TIMEOUT).then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }
}
