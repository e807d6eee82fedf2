use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::i18n::Locale;

/// Environment variable prefix; `__` separates nested keys
/// (e.g. `TOKENDECK_API__BASE_URL`).
pub const ENV_PREFIX: &str = "TOKENDECK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub api: ApiConfig,
    pub ui: UiConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
    /// Ticks before a notification auto-dismisses.
    pub notification_ttl_ticks: u32,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Credential sent with every request. Usually supplied via env.
    pub access_token: Option<String>,
    /// Header that carries `access_token`.
    pub auth_header: String,
    pub request_timeout_secs: u64,
    /// Rows per listing page.
    pub page_size: u32,
}

/// Presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub locale: Locale,
    /// Overrides the translated "copied to clipboard" confirmation.
    pub copied_message: Option<String>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
            notification_ttl_ticks: 100,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7777".to_string(),
            access_token: None,
            auth_header: "X-API-TOKEN".to_string(),
            request_timeout_secs: 30,
            page_size: 20,
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then `~/.config/tokendeck/config.toml`,
    /// then `TOKENDECK_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Same layering as [`AppConfig::load`] with an explicit file path.
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading config from {}", path.display());
        } else {
            log::debug!("No config file at {} - using defaults", path.display());
        }

        let mut config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(Box::new)?;

        if config.api.page_size == 0 {
            log::warn!("api.page_size must be positive - falling back to 20");
            config.api.page_size = ApiConfig::default().page_size;
        }

        Ok(config)
    }

    /// Resolved data directory for logs.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("tokendeck"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("tokendeck").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
