use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;

const APP_DIR: &str = "logbot";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// Treat a non-2xx answer from the ingest endpoint as a failed ingest
    pub strict_ingest: bool,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            strict_ingest: false,
            log_file: None,
            log_filter: "info".to_string(),
            tick_rate_ms: 300,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Log file to use in TUI mode: the configured one, or `logbot.log` in
    /// the user's data directory.
    pub fn resolved_log_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join(APP_DIR).join("logbot.log"))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join(APP_DIR).join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://localhost:9090");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"base_url": "http://logs.internal:8080", "strict_ingest": true}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.base_url, "http://logs.internal:8080");
        assert!(config.strict_ingest);
        assert_eq!(config.tick_rate_ms, 300);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_configured_log_file_wins() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/custom.log")),
            ..Config::default()
        };
        assert_eq!(config.resolved_log_file().unwrap(), PathBuf::from("/tmp/custom.log"));
    }
}
