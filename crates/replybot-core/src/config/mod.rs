mod defaults;


use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ReplyBotError;
use defaults::*;

/// Top-level application settings.
///
/// Distinct from the reply configuration document: settings are static
/// deploy-time choices (addresses, paths), the document is operator data
/// edited from the dashboard and held by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Dashboard + HTTP API server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token for the JSON API. Empty = no auth (local-only use).
    #[serde(default)]
    pub api_key: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
        }
    }
}

/// Bridge channel settings.
///
/// The messaging-network client runs as an external sidecar: it POSTs
/// inbound events to `/api/event` and receives routed replies at
/// `deliver_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delivery endpoint of the messaging sidecar.
    #[serde(default = "default_deliver_url")]
    pub deliver_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            deliver_url: default_deliver_url(),
        }
    }
}

impl AppConfig {
    /// Path of the reply configuration document under the data dir.
    pub fn document_path(&self) -> PathBuf {
        Path::new(&shellexpand(&self.bot.data_dir)).join("reply_config.json")
    }

    /// Directory for rolling log files.
    pub fn logs_dir(&self) -> PathBuf {
        Path::new(&shellexpand(&self.bot.data_dir)).join("logs")
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load settings from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<AppConfig, ReplyBotError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "settings file not found at {}, using defaults",
            path.display()
        );
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ReplyBotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| ReplyBotError::Config(format!("failed to parse settings: {}", e)))?;

    Ok(config)
}
