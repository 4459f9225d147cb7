use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

/// Environment variables honored by [`Config::load`], matching the managed
/// deployment's contract.
pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";
pub const BASIC_AUTH_USER_ENV: &str = "SWML_BASIC_AUTH_USER";
pub const BASIC_AUTH_PASSWORD_ENV: &str = "SWML_BASIC_AUTH_PASSWORD";
pub const LOCAL_TZ_ENV: &str = "LOCAL_TZ";

/// Top-level configuration stored on disk, with environment overrides.
///
/// The API key is the only field core logic depends on. The basic-auth
/// credentials and timezone label are carried read-only for the hosting
/// layer, which owns their enforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub basic_auth_user: String,
    pub basic_auth_password: String,
    pub local_tz: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            basic_auth_user: "dev".to_string(),
            basic_auth_password: "w00t".to_string(),
            local_tz: "America/Los_Angeles".to_string(),
        }
    }
}

impl Config {
    /// Load config from disk (empty default if absent), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_overrides(|name| env::var(name).ok());
        Ok(cfg)
    }

    fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(user) = lookup(BASIC_AUTH_USER_ENV) {
            self.basic_auth_user = user;
        }
        if let Some(password) = lookup(BASIC_AUTH_PASSWORD_ENV) {
            self.basic_auth_password = password;
        }
        if let Some(tz) = lookup(LOCAL_TZ_ENV) {
            self.local_tz = tz;
        }
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
        let dirs = ProjectDirs::from("dev", "weather-agent", "agent-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = if api_key.is_empty() { None } else { Some(api_key) };
    }

    /// Returns the WeatherAPI credential, if configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some_and(|k| !k.is_empty())
    }
}
