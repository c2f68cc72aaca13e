use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base path of the booking API (the single mandated surface)
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bounded per-call timeout for every network round-trip, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum attempts per upload phase (first try included)
    #[serde(default = "default_upload_max_attempts")]
    pub upload_max_attempts: u32,
    /// Initial backoff delay between upload retries, in milliseconds (doubles per retry)
    #[serde(default = "default_upload_backoff_base_ms")]
    pub upload_backoff_base_ms: u64,
    /// How long transient notices stay visible, in seconds
    #[serde(default = "default_notice_duration_secs")]
    pub notice_duration_secs: u64,
}

fn default_api_base() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_upload_max_attempts() -> u32 {
    3
}

fn default_upload_backoff_base_ms() -> u64 {
    250
}

fn default_notice_duration_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
            upload_max_attempts: default_upload_max_attempts(),
            upload_backoff_base_ms: default_upload_backoff_base_ms(),
            notice_duration_secs: default_notice_duration_secs(),
        }
    }
}

impl Config {
    /// Load configuration from file or create the default one
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let mut config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;

            // Empty base path would make every request relative; fall back
            if config.api_base.is_empty() {
                config.api_base = default_api_base();
            }

            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }
}

/// Default config file location (`<config dir>/autocare/client.toml`)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("autocare")
        .join("client.toml")
}
