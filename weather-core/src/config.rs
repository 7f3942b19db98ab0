use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    cache::DEFAULT_FORECAST_TTL,
    model::{DEFAULT_FORECAST_DAYS, MAX_FORECAST_DAYS, Units},
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// forecast_days = 5
/// cache_ttl_secs = 3600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    pub forecast_days: Option<u8>,

    pub cache_ttl_secs: Option<u64>,

    /// Override for the provider endpoint; mostly useful against a local mock.
    pub base_url: Option<String>,

    #[serde(skip)]
    env_api_key: Option<String>,
}

impl Config {
    /// Key from the environment if present, else the one from the file. Blank keys count as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.env_api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Apply an environment-provided key (normally `$OPENWEATHER_API_KEY`).
    pub fn with_env_api_key(mut self, key: Option<String>) -> Self {
        self.env_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn forecast_days(&self) -> u8 {
        self.forecast_days
            .unwrap_or(DEFAULT_FORECAST_DAYS)
            .clamp(1, MAX_FORECAST_DAYS)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs.map(Duration::from_secs).unwrap_or(DEFAULT_FORECAST_TTL)
    }

    /// Load config from disk (or defaults on first run), then apply the environment override.
    pub fn load() -> Result<Self> {
        let cfg = Self::load_file()?;
        Ok(cfg.with_env_api_key(std::env::var(API_KEY_ENV).ok()))
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::default();

        assert!(!cfg.has_api_key());
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.forecast_days(), 5);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn parses_toml_file_contents() {
        let cfg = Config::from_toml(
            r#"
            api_key = "FILE_KEY"
            units = "imperial"
            forecast_days = 3
            cache_ttl_secs = 120
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.forecast_days(), 3);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(120));
    }

    #[test]
    fn unknown_units_fail_to_parse() {
        assert!(Config::from_toml(r#"units = "kelvin""#).is_err());
    }

    #[test]
    fn environment_key_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_api_key(Some("ENV_KEY".into()));
        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
    }

    #[test]
    fn blank_keys_are_ignored() {
        let mut cfg = Config::default().with_env_api_key(Some("   ".into()));
        assert!(!cfg.has_api_key());

        cfg.set_api_key(" ".into());
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn forecast_days_are_clamped() {
        let cfg = Config { forecast_days: Some(30), ..Default::default() };
        assert_eq!(cfg.forecast_days(), 7);
    }

    #[test]
    fn env_key_is_not_persisted() {
        let cfg = Config::default().with_env_api_key(Some("ENV_KEY".into()));
        let toml = toml::to_string_pretty(&cfg).expect("serializable");
        assert!(!toml.contains("ENV_KEY"));
    }
}
