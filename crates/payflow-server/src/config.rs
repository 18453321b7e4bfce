//! Service configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::Path;

use payflow_gateway::GatewayConfig;

/// Full configuration for the Payflow service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// HTTP API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Payment flow settings.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Public base URL used to build the return links the gateway redirects
    /// the payer back to.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// ISO 4217 code used when the caller does not specify one.
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_listen_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    5000
}
fn default_public_base_url() -> String {
    "http://localhost:5000".into()
}
fn default_currency() -> String {
    "EUR".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            default_currency: default_currency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: ServerConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
